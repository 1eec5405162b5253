pub mod secret_string;
pub mod settings;

pub use secret_string::SecretString;
