use std::fmt;

use crate::{
    diagnostics::{Diagnostic, SourceSpan},
    lexer::{self, TokenKind},
    vocabulary::Vocabulary,
};

/// Python source produced from Schlange source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewrittenSource {
    text: String,
    substitutions: usize,
}

impl RewrittenSource {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }

    /// Number of identifier tokens that were replaced.
    pub fn substitutions(&self) -> usize {
        self.substitutions
    }
}

impl fmt::Display for RewrittenSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl AsRef<str> for RewrittenSource {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

/// Rebuilds source text from its token stream, swapping vocabulary keys for
/// their host spellings.
#[derive(Debug, Clone, Copy)]
pub struct Rewriter<'v> {
    vocabulary: &'v Vocabulary,
}

impl<'v> Rewriter<'v> {
    pub fn new(vocabulary: &'v Vocabulary) -> Self {
        Self { vocabulary }
    }

    pub fn rewrite(&self, source: &str) -> Result<RewrittenSource, Diagnostic> {
        let tokens = lexer::scan(source)?;
        let mut text = String::with_capacity(source.len());
        let mut substitutions = 0;
        let mut previous_end = 0;

        for token in tokens {
            let gap = SourceSpan::new(previous_end, token.span.start);
            if !gap.is_empty() {
                text.push_str(&source[gap.start..gap.end]);
            }
            previous_end = token.span.end;

            match token.kind {
                TokenKind::EndMarker => {}
                TokenKind::Identifier => match self.vocabulary.lookup(token.text) {
                    Some(host) => {
                        text.push_str(host);
                        substitutions += 1;
                    }
                    None => text.push_str(token.text),
                },
                _ => text.push_str(token.text),
            }
        }

        tracing::debug!(
            target: "schlange::rewrite",
            substitutions,
            bytes_in = source.len(),
            bytes_out = text.len(),
            "rewrote source"
        );
        Ok(RewrittenSource {
            text,
            substitutions,
        })
    }
}

/// Rewrites `source` with the standard vocabulary.
pub fn rewrite(source: &str) -> Result<RewrittenSource, Diagnostic> {
    let vocabulary = Vocabulary::standard()?;
    Rewriter::new(vocabulary).rewrite(source)
}
