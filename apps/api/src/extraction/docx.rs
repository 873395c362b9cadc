use docx_rs::{DocumentChild, Paragraph, ParagraphChild, RunChild};

/// Concatenates every top-level body paragraph, each followed by `\n`.
/// Tables, images and other non-paragraph blocks are skipped.
pub(super) fn extract_docx_text(bytes: &[u8]) -> Result<String, String> {
    let docx = docx_rs::read_docx(bytes).map_err(|e| format!("Failed to read DOCX: {e}"))?;

    let mut text = String::new();
    for child in &docx.document.children {
        if let DocumentChild::Paragraph(paragraph) = child {
            push_paragraph_text(&mut text, paragraph);
            text.push('\n');
        }
    }
    Ok(text)
}

/// Paragraph → Run → Text. Runs within a paragraph join with no separator.
fn push_paragraph_text(out: &mut String, paragraph: &Paragraph) {
    push_children_text(out, &paragraph.children);
}

/// Hyperlinks hold their own runs (linked e-mail addresses, profile URLs).
fn push_children_text(out: &mut String, children: &[ParagraphChild]) {
    for child in children {
        match child {
            ParagraphChild::Run(run) => {
                for run_child in &run.children {
                    match run_child {
                        RunChild::Text(t) => out.push_str(&t.text),
                        RunChild::Tab(_) => out.push('\t'),
                        RunChild::Break(_) => out.push('\n'),
                        _ => {}
                    }
                }
            }
            ParagraphChild::Hyperlink(link) => push_children_text(out, &link.children),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::fixtures::docx_bytes;

    #[test]
    fn test_runs_within_paragraph_join_without_separator() {
        use docx_rs::{Docx, Paragraph, Run};
        use std::io::Cursor;

        let paragraph = Paragraph::new()
            .add_run(Run::new().add_text("Backend"))
            .add_run(Run::new().add_text("Engineer"));
        let mut cursor = Cursor::new(Vec::new());
        Docx::new()
            .add_paragraph(paragraph)
            .build()
            .pack(&mut cursor)
            .unwrap();

        let text = extract_docx_text(&cursor.into_inner()).unwrap();
        assert_eq!(text, "BackendEngineer\n");
    }

    #[test]
    fn test_hyperlink_text_is_kept() {
        use docx_rs::{Docx, Hyperlink, HyperlinkType, Paragraph, Run};
        use std::io::Cursor;

        let contact = Paragraph::new()
            .add_run(Run::new().add_text("Email:"))
            .add_hyperlink(
                Hyperlink::new("mailto:jane@example.com", HyperlinkType::External)
                    .add_run(Run::new().add_text("jane@example.com")),
            );
        let profile = Paragraph::new().add_hyperlink(
            Hyperlink::new("https://github.com/jane", HyperlinkType::External)
                .add_run(Run::new().add_text("github.com/jane")),
        );
        let mut cursor = Cursor::new(Vec::new());
        Docx::new()
            .add_paragraph(contact)
            .add_paragraph(profile)
            .build()
            .pack(&mut cursor)
            .unwrap();

        let text = extract_docx_text(&cursor.into_inner()).unwrap();
        assert_eq!(text, "Email:jane@example.com\ngithub.com/jane\n");
    }

    #[test]
    fn test_empty_document_yields_empty_text() {
        let text = extract_docx_text(&docx_bytes(&[])).unwrap();
        assert!(text.is_empty());
    }
}
