// Reusable UI widgets

pub mod picture;
pub mod text_input;
pub mod toast;

pub use picture::{HalfBlockImage, PictureView};
pub use text_input::{TextInputWidget, TextInputWidgetExt};
pub use toast::ToastWidget;
