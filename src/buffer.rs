//! The three source buffers edited side by side.
//!
//! Buffers are siblings, not a collection: there is always exactly one
//! markup, one style and one script buffer.

use std::fmt;

/// Default markup template used on first load and on reset.
pub const DEFAULT_MARKUP: &str = r#"<div class="content-box">
  <h1>Welcome to livepen</h1>
  <p>Happy hacking!</p>
</div>"#;

/// Default style template used on first load and on reset.
pub const DEFAULT_STYLE: &str = r"body {
  background: #282a36;
  color: #f8f8f2;
  font-family: sans-serif;
}
.content-box {
  padding: 20px;
  background: #333;
  border-radius: 5px;
}";

/// Default script template used on first load and on reset.
pub const DEFAULT_SCRIPT: &str = r#"// Tip: switch themes with `livepen settings --theme christmas`.
console.log("livepen initialized.");"#;

/// Which pane a buffer belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferKind {
    Markup,
    Style,
    Script,
}

impl BufferKind {
    /// All kinds, in pane order.
    pub const ALL: [Self; 3] = [Self::Markup, Self::Style, Self::Script];

    /// Short lowercase label used in logs and notices.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Markup => "markup",
            Self::Style => "style",
            Self::Script => "script",
        }
    }

    pub const fn default_template(self) -> &'static str {
        match self {
            Self::Markup => DEFAULT_MARKUP,
            Self::Style => DEFAULT_STYLE,
            Self::Script => DEFAULT_SCRIPT,
        }
    }
}

impl fmt::Display for BufferKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The markup, style and script buffers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceBuffers {
    markup: String,
    style: String,
    script: String,
}

impl SourceBuffers {
    /// Create a buffer set from explicit contents.
    pub fn new(
        markup: impl Into<String>,
        style: impl Into<String>,
        script: impl Into<String>,
    ) -> Self {
        Self {
            markup: markup.into(),
            style: style.into(),
            script: script.into(),
        }
    }

    /// Create a buffer set populated with the default templates.
    pub fn defaults() -> Self {
        Self::new(DEFAULT_MARKUP, DEFAULT_STYLE, DEFAULT_SCRIPT)
    }

    pub fn get(&self, kind: BufferKind) -> &str {
        match kind {
            BufferKind::Markup => &self.markup,
            BufferKind::Style => &self.style,
            BufferKind::Script => &self.script,
        }
    }

    /// Replace the whole content of one buffer.
    pub fn replace(&mut self, kind: BufferKind, text: impl Into<String>) {
        let slot = match kind {
            BufferKind::Markup => &mut self.markup,
            BufferKind::Style => &mut self.style,
            BufferKind::Script => &mut self.script,
        };
        *slot = text.into();
    }

    /// Overwrite all three buffers with the default templates.
    pub fn reset(&mut self) {
        *self = Self::defaults();
    }

    pub fn markup(&self) -> &str {
        &self.markup
    }

    pub fn style(&self) -> &str {
        &self.style
    }

    pub fn script(&self) -> &str {
        &self.script
    }
}

impl Default for SourceBuffers {
    fn default() -> Self {
        Self::defaults()
    }
}
