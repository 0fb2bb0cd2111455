use thiserror::Error;

#[derive(Error, Debug)]
pub enum GrammarError {
    #[error("{file}:{line}:{column}: {message}")]
    Syntax {
        file: String,
        line: usize,
        column: usize,
        message: String,
    },

    #[error("{file}: unexpected end of input while parsing {context}")]
    UnexpectedEof { file: String, context: &'static str },
}

impl GrammarError {
    pub fn syntax(file: &str, line: usize, column: usize, message: impl Into<String>) -> Self {
        GrammarError::Syntax {
            file: file.to_string(),
            line,
            column,
            message: message.into(),
        }
    }

    pub fn eof(file: &str, context: &'static str) -> Self {
        GrammarError::UnexpectedEof {
            file: file.to_string(),
            context,
        }
    }
}
