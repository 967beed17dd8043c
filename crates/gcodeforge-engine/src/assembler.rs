//! Final document assembly
//!
//! Output order: banner, header, blank, instances, blank, footer. Empty
//! sections are skipped along with their separator, and blank lines at the
//! edges of each section are trimmed so separators never double up.
//! Whole-document results go through [`Assembler::single`] untouched.

use gcodeforge_core::Program;
use std::fmt;

/// The finished, write-once conversion result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputDocument {
    program: Program,
}

impl OutputDocument {
    /// The output as lines
    pub fn program(&self) -> &Program {
        &self.program
    }

    /// Number of output lines
    pub fn line_count(&self) -> usize {
        self.program.len()
    }

    /// The output as newline-joined text
    pub fn text(&self) -> String {
        self.program.to_text()
    }

    /// Take the underlying program
    pub fn into_program(self) -> Program {
        self.program
    }
}

impl fmt::Display for OutputDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.program, f)
    }
}

/// Joins the converted segments into an [`OutputDocument`]
#[derive(Debug, Clone, Default)]
pub struct Assembler {
    banner: Vec<String>,
}

impl Assembler {
    /// An assembler with no banner
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the comment banner placed before everything else
    pub fn with_banner(mut self, banner: Vec<String>) -> Self {
        self.banner = banner;
        self
    }

    /// Join the sections.
    pub fn assemble(
        &self,
        header: &Program,
        instances: &Program,
        footer: &Program,
    ) -> OutputDocument {
        let mut lines = Vec::new();

        if !self.banner.is_empty() {
            lines.extend(self.banner.iter().cloned());
            lines.push(String::new());
        }

        let sections = [header, instances, footer]
            .into_iter()
            .map(Program::trim_blank_edges)
            .filter(|section| !section.is_empty());

        for (index, section) in sections.enumerate() {
            if index > 0 {
                lines.push(String::new());
            }
            lines.extend(section.into_lines());
        }

        OutputDocument {
            program: Program::new(lines),
        }
    }

    /// Wrap a whole-document result, keeping its lines exactly as they are.
    pub fn single(&self, program: Program) -> OutputDocument {
        let mut lines = Vec::with_capacity(self.banner.len() + program.len() + 1);
        if !self.banner.is_empty() {
            lines.extend(self.banner.iter().cloned());
            lines.push(String::new());
        }
        lines.extend(program.into_lines());
        OutputDocument {
            program: Program::new(lines),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_order_and_separators() {
        let document = Assembler::new().assemble(
            &Program::from_text("% 0 Holes\n\nG1 F10000\nM3\n"),
            &Program::from_text("X1 Y1 B0\n\nX1 Y1 B8"),
            &Program::from_text("\nZ0\nX0\n\nM5\nM30"),
        );

        assert_eq!(
            document.text(),
            "% 0 Holes\n\nG1 F10000\nM3\n\nX1 Y1 B0\n\nX1 Y1 B8\n\nZ0\nX0\n\nM5\nM30"
        );
        assert_eq!(document.line_count(), 14);
    }

    #[test]
    fn test_banner_comes_first() {
        let document = Assembler::new()
            .with_banner(vec!["; banner".to_string()])
            .assemble(
                &Program::from_text("M3"),
                &Program::from_text("X1 Y1"),
                &Program::from_text("M30"),
            );
        assert_eq!(document.text(), "; banner\n\nM3\n\nX1 Y1\n\nM30");
    }

    #[test]
    fn test_empty_sections_are_skipped() {
        let document = Assembler::new().assemble(
            &Program::default(),
            &Program::from_text("\nX1 Y1\nX2 Y2\n\n"),
            &Program::from_text("\n"),
        );
        assert_eq!(document.to_string(), "X1 Y1\nX2 Y2");
    }

    #[test]
    fn test_single_keeps_lines() {
        let document = Assembler::new().single(Program::from_text("\nX1 Y1\n\nX2 Y2"));
        assert_eq!(document.text(), "\nX1 Y1\n\nX2 Y2");
        assert_eq!(document.line_count(), 4);
    }
}
