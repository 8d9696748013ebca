#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub use ogs_codec as codec;
pub use ogs_reflect as reflect;
pub use ogs_utils as utils;
