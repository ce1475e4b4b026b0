use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("failed to set language for parser")]
    LanguageSet,

    #[error("failed to parse source code")]
    ParseFailed,

    #[error("syntax error at byte {byte_start}..{byte_end}")]
    Syntax { byte_start: usize, byte_end: usize },
}
