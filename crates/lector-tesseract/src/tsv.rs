//! Parsing of tesseract's TSV output.
//!
//! Each row describes one layout element. Rows at [`WORD_LEVEL`] carry the
//! recognized text and a confidence in `0..=100`; structural rows carry a
//! confidence of `-1` and no text.

use crate::{Error, Result};

/// Row level of individual words.
pub const WORD_LEVEL: u8 = 5;

const COLUMNS: usize = 12;

/// A recognized word with its position in the layout hierarchy.
#[derive(Debug, Clone, PartialEq)]
pub struct Word {
    /// Page number, starting at 1.
    pub page: u32,
    /// Block number within the page.
    pub block: u32,
    /// Paragraph number within the block.
    pub paragraph: u32,
    /// Line number within the paragraph.
    pub line: u32,
    /// Confidence in `0.0..=100.0`.
    pub confidence: f64,
    /// Word text.
    pub text: String,
}

impl Word {
    fn paragraph_key(&self) -> (u32, u32, u32) {
        (self.page, self.block, self.paragraph)
    }

    fn line_key(&self) -> (u32, u32, u32, u32) {
        (self.page, self.block, self.paragraph, self.line)
    }
}

/// Words recognized on a page, in reading order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TsvPage {
    /// Recognized words.
    pub words: Vec<Word>,
}

impl TsvPage {
    /// Parses TSV output, header row included.
    pub fn parse(input: &str) -> Result<Self> {
        let mut rows = input.lines().filter(|row| !row.trim().is_empty());

        match rows.next() {
            Some(header) if header.starts_with("level\t") => {}
            Some(_) => return Err(Error::invalid_output("missing TSV header")),
            None => return Ok(Self::default()),
        }

        let mut words = Vec::new();
        for row in rows {
            if let Some(word) = parse_row(row)? {
                words.push(word);
            }
        }

        Ok(Self { words })
    }

    /// Reconstructs plain text: words joined by spaces, lines by newlines,
    /// and paragraphs separated by a blank line.
    pub fn text(&self) -> String {
        let mut text = String::new();
        let mut previous: Option<&Word> = None;

        for word in &self.words {
            if let Some(prev) = previous {
                if prev.paragraph_key() != word.paragraph_key() {
                    text.push_str("\n\n");
                } else if prev.line_key() != word.line_key() {
                    text.push('\n');
                } else {
                    text.push(' ');
                }
            }
            text.push_str(&word.text);
            previous = Some(word);
        }

        text
    }

    /// Mean word confidence, or zero without words.
    pub fn confidence(&self) -> f64 {
        if self.words.is_empty() {
            return 0.0;
        }
        self.words.iter().map(|w| w.confidence).sum::<f64>() / self.words.len() as f64
    }
}

fn parse_row(row: &str) -> Result<Option<Word>> {
    let fields: Vec<&str> = row.splitn(COLUMNS, '\t').collect();
    if fields.len() < COLUMNS - 1 {
        return Err(Error::invalid_output(format!(
            "expected {COLUMNS} columns, got {}",
            fields.len()
        )));
    }

    let number = |index: usize| -> Result<u32> {
        fields[index].trim().parse().map_err(|_| {
            Error::invalid_output(format!("column {index} is not a number: '{}'", fields[index]))
        })
    };

    if number(0)? != u32::from(WORD_LEVEL) {
        return Ok(None);
    }

    let text = fields.get(11).map(|t| t.trim()).unwrap_or_default();
    let confidence: f64 = fields[10]
        .trim()
        .parse()
        .map_err(|_| Error::invalid_output(format!("invalid confidence '{}'", fields[10])))?;

    if text.is_empty() || confidence < 0.0 {
        return Ok(None);
    }

    Ok(Some(Word {
        page: number(1)?,
        block: number(2)?,
        paragraph: number(3)?,
        line: number(4)?,
        confidence: confidence.min(100.0),
        text: text.to_owned(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str =
        "level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext";

    fn tsv(rows: &[&str]) -> String {
        let mut out = String::from(HEADER);
        for row in rows {
            out.push('\n');
            out.push_str(row);
        }
        out.push('\n');
        out
    }

    #[test]
    fn rebuilds_lines_and_paragraphs() {
        let input = tsv(&[
            "1\t1\t0\t0\t0\t0\t0\t0\t100\t100\t-1\t",
            "5\t1\t1\t1\t1\t1\t0\t0\t10\t10\t90\tHello",
            "5\t1\t1\t1\t1\t2\t12\t0\t10\t10\t80\tworld",
            "5\t1\t1\t1\t2\t1\t0\t12\t10\t10\t70\tsecond",
            "5\t1\t1\t2\t1\t1\t0\t30\t10\t10\t60\tnext",
        ]);

        let page = TsvPage::parse(&input).unwrap();
        assert_eq!(page.text(), "Hello world\nsecond\n\nnext");
        assert_eq!(page.confidence(), 75.0);
    }

    #[test]
    fn skips_structural_and_blank_words() {
        let input = tsv(&[
            "4\t1\t1\t1\t1\t0\t0\t0\t10\t10\t-1\t",
            "5\t1\t1\t1\t1\t1\t0\t0\t10\t10\t95.5\t ",
            "5\t1\t1\t1\t1\t2\t0\t0\t10\t10\t-1\t",
        ]);

        let page = TsvPage::parse(&input).unwrap();
        assert!(page.words.is_empty());
        assert_eq!(page.text(), "");
        assert_eq!(page.confidence(), 0.0);
    }

    #[test]
    fn empty_output_is_empty_page() {
        assert_eq!(TsvPage::parse("").unwrap(), TsvPage::default());
        assert_eq!(TsvPage::parse(HEADER).unwrap(), TsvPage::default());
    }

    #[test]
    fn rejects_malformed_rows() {
        assert!(TsvPage::parse("garbage").is_err());
        assert!(TsvPage::parse(&tsv(&["5\t1\t1"])).is_err());
        assert!(TsvPage::parse(&tsv(&["5\t1\t1\t1\t1\t1\t0\t0\t1\t1\thigh\tword"])).is_err());
    }
}
