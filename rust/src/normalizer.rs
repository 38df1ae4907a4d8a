use crate::{NOTE_IMAGE_BASE_URL, NOTE_IMAGE_EXTENSION};

/// Reduz um nome de nota a um slug seguro para nome de arquivo: minúsculas,
/// acentos latinos dobrados para a letra base, espaços viram hífen e todo o
/// resto fora de `[a-z0-9-]` é descartado. Total: nunca falha, pode devolver
/// uma string vazia.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;

    for ch in name.chars().flat_map(char::to_lowercase) {
        let ch = fold_accent(ch);
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            slug.push(ch);
            pending_hyphen = false;
        } else if ch == '-' {
            if !slug.is_empty() {
                slug.push(ch);
            }
            pending_hyphen = false;
        } else if ch.is_whitespace() {
            pending_hyphen = true;
        }
    }

    slug
}

/// URL padrão derivada do nome, gravada no campo de imagem sempre que o nome
/// é (re)digitado.
pub fn note_image_url(name: &str) -> String {
    format!(
        "{}{}{}",
        NOTE_IMAGE_BASE_URL,
        slugify(name),
        NOTE_IMAGE_EXTENSION
    )
}

// Tabela fixa: diacríticos do português/espanhol. Entradas já em minúsculas
// porque slugify rebaixa antes de dobrar.
fn fold_accent(ch: char) -> char {
    match ch {
        'á' | 'à' | 'â' | 'ä' | 'ã' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'ö' | 'õ' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        'ñ' => 'n',
        _ => ch,
    }
}

#[cfg(test)]
mod tests {
    use super::{note_image_url, slugify};

    #[test]
    fn folds_accents_and_hyphenates_spaces() {
        assert_eq!(slugify("Lavanda Francesa"), "lavanda-francesa");
        assert_eq!(slugify("Âmbar & Cedro"), "ambar-cedro");
        assert_eq!(slugify("Coração de Maçã"), "coracao-de-maca");
        assert_eq!(slugify("Niñá"), "nina");
    }

    #[test]
    fn is_idempotent_and_stays_in_charset() {
        let samples = [
            "Lavanda Francesa",
            "Âmbar & Cedro",
            "  Flor   de Laranjeira  ",
            "Patchouli!!!",
            "éàïõü",
            "",
            "123 Rosas",
        ];
        for sample in samples {
            let once = slugify(sample);
            assert_eq!(slugify(&once), once, "slugify não é idempotente para {sample:?}");
            assert!(
                once.chars()
                    .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-'),
                "caractere fora de [a-z0-9-] em {once:?}"
            );
        }
    }

    #[test]
    fn empty_and_symbol_only_names_become_empty_slugs() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("!!!"), "");
        assert_eq!(slugify("   "), "");
    }

    #[test]
    fn derived_url_uses_fixed_prefix_and_extension() {
        let url = note_image_url("Lavanda Francesa");
        assert!(url.starts_with("https://cdn.perfumaria.app/notas/"));
        assert!(url.ends_with("/lavanda-francesa.webp"));
    }
}
