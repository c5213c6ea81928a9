/// Image byte decoding.
pub mod decode;
/// Asynchronous frame image loading.
pub mod loader;
/// Locator → bytes providers.
pub mod source;
/// Font faces and text shaping.
pub mod text;
