//! Math node views handed to rendering callbacks.

/// Inline math node (`$...$`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineMath {
    pub latex: String,
}

impl InlineMath {
    pub fn new(latex: impl Into<String>) -> Self {
        Self {
            latex: latex.into(),
        }
    }
}

/// Display math node (`$$...$$` or a fenced `math` block).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayMath {
    pub latex: String,
    /// Explicit equation number assigned by the host.
    pub number: Option<usize>,
    /// Label used to build the container id.
    pub label: Option<String>,
}

impl DisplayMath {
    pub fn new(latex: impl Into<String>) -> Self {
        Self {
            latex: latex.into(),
            number: None,
            label: None,
        }
    }

    pub fn with_number(mut self, number: usize) -> Self {
        self.number = Some(number);
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Splits the source on blank lines, dropping whitespace only parts.
    pub fn parts(&self) -> Vec<&str> {
        self.latex
            .split("\n\n")
            .filter(|part| !part.trim().is_empty())
            .collect()
    }
}
