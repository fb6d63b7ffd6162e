// --- File: crates/togethernow_auth/src/lib.rs ---
pub mod doc;
pub mod handlers;
pub mod local;
pub mod logic;
pub mod recaptcha;
pub mod routes;

pub use local::LocalIdentityService;
pub use recaptcha::RecaptchaVerifier;
pub use routes::routes;
