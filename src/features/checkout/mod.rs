//! Paid listing checkout.
//!
//! When a payment provider is configured, new listings stay pending until a
//! hosted checkout session is confirmed on return or by webhook. Without a
//! provider, `/checkout/{slug}` publishes the listing directly.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/checkout/{slug}` | Redirect to hosted checkout (303) |
//! | GET | `/checkout/success` | Confirm session, render result page |
//! | GET | `/checkout/cancel` | Flash notice, back to the directory |
//! | POST | `/checkout/webhook` | Provider webhook (`Stripe-Signature`) |

pub mod clients;
pub mod handlers;
pub mod routes;
pub mod services;

pub use clients::create_gateway;
pub use services::CheckoutService;
