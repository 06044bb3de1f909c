mod credentials;
mod helpers;
