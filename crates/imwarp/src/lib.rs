#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

#[doc(inline)]
pub use imwarp_image as image;

#[doc(inline)]
pub use imwarp_imgproc as imgproc;

#[doc(inline)]
pub use imwarp_io as io;
