//! Java source emitter - builds generated source strings
//!
//! This module provides a small indentation-aware buffer for writing the generated companion types.

/// A buffer for building Java source code with proper indentation
#[derive(Debug)]
pub struct JavaEmitter {
    buffer: String,
    indent_level: usize,
    indent_str: &'static str,
}

impl Default for JavaEmitter {
    fn default() -> Self {
        Self::new()
    }
}

impl JavaEmitter {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            indent_level: 0,
            indent_str: "  ", // 2 spaces, as in the generated artifacts
        }
    }

    /// Get the generated code
    pub fn finish(self) -> String {
        self.buffer
    }

    /// Get current buffer as string slice
    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    /// Write a line with current indentation
    pub fn line(&mut self, s: &str) {
        self.write_indent();
        self.buffer.push_str(s);
        self.buffer.push('\n');
    }

    /// Write indentation only
    pub fn write_indent(&mut self) {
        for _ in 0..self.indent_level {
            self.buffer.push_str(self.indent_str);
        }
    }

    /// Increase indent level
    pub fn indent(&mut self) {
        self.indent_level += 1;
    }

    /// Decrease indent level
    pub fn dedent(&mut self) {
        if self.indent_level > 0 {
            self.indent_level -= 1;
        }
    }

    /// Write a block with braces
    pub fn block<F>(&mut self, header: &str, f: F)
    where
        F: FnOnce(&mut Self),
    {
        self.line(&format!("{} {{", header));
        self.indent();
        f(self);
        self.dedent();
        self.line("}");
    }

    /// Write a package declaration. The unnamed package has none.
    pub fn package_decl(&mut self, package: &str) {
        if !package.is_empty() {
            self.line(&format!("package {};", package));
        }
    }

    /// Write a `public final class` with the given body
    pub fn final_class<F>(&mut self, name: &str, f: F)
    where
        F: FnOnce(&mut Self),
    {
        self.block(&format!("public final class {}", name), f);
    }

    /// Write a `public static` field without initializer
    pub fn static_field(&mut self, ty: &str, name: &str) {
        self.line(&format!("public static {} {};", ty, name));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_indents_body() {
        let mut e = JavaEmitter::new();
        e.block("class A", |e| e.line("int x;"));
        assert_eq!(e.finish(), "class A {\n  int x;\n}\n");
    }

    #[test]
    fn test_nested_blocks() {
        let mut e = JavaEmitter::new();
        e.block("class A", |e| e.block("class B", |e| e.line("int y;")));
        assert_eq!(e.as_str(), "class A {\n  class B {\n    int y;\n  }\n}\n");
    }

    #[test]
    fn test_unnamed_package_has_no_declaration() {
        let mut e = JavaEmitter::new();
        e.package_decl("");
        assert_eq!(e.as_str(), "");
        e.package_decl("sample");
        assert_eq!(e.as_str(), "package sample;\n");
    }

    #[test]
    fn test_dedent_saturates() {
        let mut e = JavaEmitter::new();
        e.dedent();
        e.line("x");
        assert_eq!(e.finish(), "x\n");
    }
}
