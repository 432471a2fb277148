#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

pub use odc_edm as edm;
pub use odc_serializer as serializer;
pub use odc_utils as utils;
