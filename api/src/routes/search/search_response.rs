use note_index::NoteMatch;
use serde::Serialize;

/// Top-1 hit with the two retrieval URLs.
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    /// Display name of the matched note.
    pub name: String,
    /// Inline view URL, `/pdf/<percent-encoded filename>`.
    pub url: String,
    /// Attachment download URL, `/download/<filename>`.
    pub download_url: String,
    pub score: f32,
}

impl From<NoteMatch> for SearchResponse {
    fn from(m: NoteMatch) -> Self {
        Self {
            url: format!("/pdf/{}", urlencoding::encode(&m.filename)),
            download_url: format!("/download/{}", urlencoding::encode(&m.filename)),
            name: m.display_name,
            score: m.score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(filename: &str) -> NoteMatch {
        NoteMatch {
            display_name: "n".into(),
            filename: filename.into(),
            score: 0.5,
        }
    }

    #[test]
    fn urls_encode_reserved_characters() {
        let res = SearchResponse::from(hit("C#_Notes 100%?.pdf"));
        assert_eq!(res.url, "/pdf/C%23_Notes%20100%25%3F.pdf");
        assert_eq!(res.download_url, "/download/C%23_Notes%20100%25%3F.pdf");
    }

    #[test]
    fn plain_names_are_unchanged() {
        let res = SearchResponse::from(hit("Linear_Algebra_Notes.pdf"));
        assert_eq!(res.url, "/pdf/Linear_Algebra_Notes.pdf");
    }
}
