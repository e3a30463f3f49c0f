use lumen_style::StyleError;
use lumen_tokens::TokenError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Style(#[from] StyleError),
}
