use serde::{Deserialize, Serialize};

use crate::extractor::extract_pyramid;
use crate::normalizer::note_image_url;
use crate::renderer::{render_pyramid_block, splice_pyramid_block};
use crate::{BASE_TIER_LABEL, HEART_TIER_LABEL, TOP_TIER_LABEL};

/// Uma nota olfativa: rótulo livre + URL de imagem (derivada ou manual).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub name: String,
    pub image_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Top,
    Heart,
    Base,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Top, Tier::Heart, Tier::Base];

    pub fn label(self) -> &'static str {
        match self {
            Tier::Top => TOP_TIER_LABEL,
            Tier::Heart => HEART_TIER_LABEL,
            Tier::Base => BASE_TIER_LABEL,
        }
    }
}

/// As três sequências ordenadas de notas. Cada camada pode estar vazia;
/// a ordem de inserção é a ordem de exibição.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pyramid {
    pub top: Vec<Note>,
    pub heart: Vec<Note>,
    pub base: Vec<Note>,
}

impl Pyramid {
    pub fn notes(&self, tier: Tier) -> &[Note] {
        match tier {
            Tier::Top => &self.top,
            Tier::Heart => &self.heart,
            Tier::Base => &self.base,
        }
    }

    pub fn notes_mut(&mut self, tier: Tier) -> &mut Vec<Note> {
        match tier {
            Tier::Top => &mut self.top,
            Tier::Heart => &mut self.heart,
            Tier::Base => &mut self.base,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.top.is_empty() && self.heart.is_empty() && self.base.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteField {
    Name,
    ImageUrl,
}

/// Estado da sessão de edição: pirâmide corrente, o HTML original colado
/// (guardado intacto como alvo da substituição) e a última saída gerada.
#[derive(Debug, Default)]
pub struct EditorSession {
    pyramid: Pyramid,
    source_html: String,
    output_html: String,
    editing: bool,
}

impl EditorSession {
    pub fn pyramid(&self) -> &Pyramid {
        &self.pyramid
    }

    pub fn output_html(&self) -> &str {
        &self.output_html
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    /// Carrega um documento colado: extrai a pirâmide e retém o snapshot.
    /// Um documento sem contêiner é um estado válido de "começar do zero".
    pub fn load(&mut self, html: &str) {
        self.pyramid = extract_pyramid(html);
        self.source_html = html.to_string();
        self.output_html.clear();
        self.editing = true;
    }

    pub fn add_note(&mut self, tier: Tier) {
        self.pyramid.notes_mut(tier).push(Note::default());
    }

    /// Edita um campo da nota. Editar o nome rederiva a URL da imagem,
    /// sobrescrevendo qualquer valor manual; editar a URL não toca o nome.
    pub fn edit_note(&mut self, tier: Tier, index: usize, field: NoteField, value: &str) -> bool {
        let Some(note) = self.pyramid.notes_mut(tier).get_mut(index) else {
            return false;
        };

        match field {
            NoteField::Name => {
                note.name = value.to_string();
                note.image_url = note_image_url(value);
            }
            NoteField::ImageUrl => {
                note.image_url = value.to_string();
            }
        }
        true
    }

    pub fn remove_note(&mut self, tier: Tier, index: usize) -> bool {
        let notes = self.pyramid.notes_mut(tier);
        if index >= notes.len() {
            return false;
        }
        notes.remove(index);
        true
    }

    /// Regenera o documento de saída: renderiza o bloco da pirâmide e o
    /// substitui no snapshot original. Nunca falha.
    pub fn generate(&mut self) -> &str {
        let block = render_pyramid_block(&self.pyramid);
        self.output_html = splice_pyramid_block(&self.source_html, &block);
        &self.output_html
    }

    /// Volta ao passo de colagem descartando toda a sessão.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::{EditorSession, NoteField, Tier};

    #[test]
    fn name_edit_rederives_image_url() {
        let mut session = EditorSession::default();
        session.load("<p>sem pirâmide</p>");
        session.add_note(Tier::Top);

        session.edit_note(Tier::Top, 0, NoteField::ImageUrl, "https://example.com/x.png");
        session.edit_note(Tier::Top, 0, NoteField::Name, "Lavanda Francesa");

        let note = &session.pyramid().notes(Tier::Top)[0];
        assert_eq!(note.name, "Lavanda Francesa");
        assert!(note.image_url.ends_with("/lavanda-francesa.webp"));
    }

    #[test]
    fn url_edit_leaves_name_untouched() {
        let mut session = EditorSession::default();
        session.load("");
        session.add_note(Tier::Heart);
        session.edit_note(Tier::Heart, 0, NoteField::Name, "Jasmim");

        session.edit_note(Tier::Heart, 0, NoteField::ImageUrl, "https://example.com/j.webp");

        let note = &session.pyramid().notes(Tier::Heart)[0];
        assert_eq!(note.name, "Jasmim");
        assert_eq!(note.image_url, "https://example.com/j.webp");
    }

    #[test]
    fn edits_out_of_range_are_rejected() {
        let mut session = EditorSession::default();
        session.load("");

        assert!(!session.edit_note(Tier::Base, 0, NoteField::Name, "x"));
        assert!(!session.remove_note(Tier::Base, 3));
    }

    #[test]
    fn remove_preserves_order_of_remaining_notes() {
        let mut session = EditorSession::default();
        session.load("");
        for name in ["Bergamota", "Limão", "Mandarina"] {
            session.add_note(Tier::Top);
            let last = session.pyramid().notes(Tier::Top).len() - 1;
            session.edit_note(Tier::Top, last, NoteField::Name, name);
        }

        assert!(session.remove_note(Tier::Top, 1));

        let names: Vec<&str> = session
            .pyramid()
            .notes(Tier::Top)
            .iter()
            .map(|note| note.name.as_str())
            .collect();
        assert_eq!(names, vec!["Bergamota", "Mandarina"]);
    }

    #[test]
    fn reset_discards_session() {
        let mut session = EditorSession::default();
        session.load("<div id=\"piramide-olfativa\"></div>");
        session.add_note(Tier::Base);
        session.generate();

        session.reset();

        assert!(!session.is_editing());
        assert!(session.pyramid().is_empty());
        assert!(session.output_html().is_empty());
    }
}
