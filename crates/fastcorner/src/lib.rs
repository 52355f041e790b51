#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

#[doc(inline)]
pub use fastcorner_image as image;

#[doc(inline)]
pub use fastcorner_imgproc as imgproc;

#[doc(inline)]
pub use fastcorner_io as io;
