pub mod gemini;
pub mod paypal;
pub mod razorpay;

pub use gemini::*;
pub use paypal::*;
pub use razorpay::*;
