//! Preview layer: the image list, the selection and the shared render
//! surface that both export paths read from.

pub mod controller;
pub mod images;
pub mod surface;

pub use controller::{PreviewController, PreviewSettings, RenderTicket};
pub use images::{decode_preview, ImageEntry, ImageId, ImageList, ImageStatus};
pub use surface::{encode_png, FrameContent, FrameStamp, PaintOutcome, RenderSurface};
