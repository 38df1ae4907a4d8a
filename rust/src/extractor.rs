use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::pyramid::{Note, Pyramid, Tier};
use crate::PYRAMID_CONTAINER_ID;

// Abertura de <div> com o id do contêiner em qualquer posição de atributo,
// com qualquer estilo de aspas, até o PRIMEIRO </div> (menor casamento).
// Um </div> aninhado dentro do contêiner original trunca o casamento aqui;
// comportamento conhecido e mantido, o conteúdo gerado pelo editor nunca
// aninha divs.
static CONTAINER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r#"(?is)<div\b[^>]*\bid\s*=\s*["']?{id}["']?[^>]*>(.*?)</div\s*>"#,
        id = regex::escape(PYRAMID_CONTAINER_ID),
    ))
    .expect("container pattern should compile")
});

static HEADING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<h[1-6][^>]*>(.*?)</h[1-6]\s*>").expect("heading pattern"));

// Ancorado no início: o "próximo irmão" do título precisa ser a tabela.
static NEXT_TABLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)^\s*<table\b[^>]*>(.*?)</table\s*>").expect("table pattern"));

static CELL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<td\b[^>]*>(.*?)</td\s*>").expect("cell pattern"));

static PARAGRAPH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<p\b[^>]*>(.*?)</p\s*>").expect("paragraph pattern"));

static IMG_SRC_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<img\b[^>]*\bsrc\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s>"']+))"#)
        .expect("img pattern")
});

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<[^>]*>").expect("tag pattern"));

/// Localiza o trecho completo do contêiner da pirâmide (da tag de abertura
/// ao primeiro fechamento). O splicer substitui exatamente esse intervalo.
pub fn locate_container(html: &str) -> Option<Range<usize>> {
    CONTAINER_RE.find(html).map(|found| found.range())
}

/// Extrai a pirâmide de um documento colado. Melhor esforço: qualquer string
/// de entrada produz uma pirâmide, no pior caso vazia. A busca de cada camada
/// é independente; a ausência de um título esvazia só aquela camada.
pub fn extract_pyramid(html: &str) -> Pyramid {
    let Some(caps) = CONTAINER_RE.captures(html) else {
        return Pyramid::default();
    };
    let inner = caps.get(1).map(|m| m.as_str()).unwrap_or_default();

    Pyramid {
        top: extract_tier(inner, Tier::Top),
        heart: extract_tier(inner, Tier::Heart),
        base: extract_tier(inner, Tier::Base),
    }
}

fn extract_tier(inner: &str, tier: Tier) -> Vec<Note> {
    for heading in HEADING_RE.captures_iter(inner) {
        let text = plain_text(heading.get(1).map(|m| m.as_str()).unwrap_or_default());
        if !text.contains(tier.label()) {
            continue;
        }

        // Primeiro título que casa decide; sem tabela logo em seguida, a
        // camada fica vazia.
        let after = &inner[heading.get(0).map(|m| m.end()).unwrap_or(inner.len())..];
        let Some(table) = NEXT_TABLE_RE.captures(after) else {
            return Vec::new();
        };
        let table_inner = table.get(1).map(|m| m.as_str()).unwrap_or_default();
        return extract_cells(table_inner);
    }

    Vec::new()
}

fn extract_cells(table_inner: &str) -> Vec<Note> {
    let mut notes = Vec::new();
    for cell in CELL_RE.captures_iter(table_inner) {
        let cell_html = cell.get(1).map(|m| m.as_str()).unwrap_or_default();

        let name_html = PARAGRAPH_RE
            .captures(cell_html)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
            .unwrap_or(cell_html);
        let name = plain_text(name_html);
        if name.is_empty() {
            continue;
        }

        let image_url = IMG_SRC_RE
            .captures(cell_html)
            .and_then(|caps| caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3)))
            .map(|m| {
                html_escape::decode_html_entities(m.as_str())
                    .trim()
                    .to_string()
            })
            .unwrap_or_default();

        notes.push(Note { name, image_url });
    }
    notes
}

fn plain_text(html: &str) -> String {
    let stripped = TAG_RE.replace_all(html, "");
    html_escape::decode_html_entities(stripped.as_ref())
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::{extract_pyramid, locate_container};

    const SAMPLE: &str = r#"<article>
<h1>Perfume Noite de Verão</h1>
<div class="descricao" id="piramide-olfativa" data-origem="cms">
  <h3>Notas de Topo</h3>
  <table><tbody><tr>
    <td><img src="https://cdn.perfumaria.app/notas/bergamota.webp" alt="Bergamota"><p>Bergamota</p></td>
    <td><img src='https://cdn.perfumaria.app/notas/limao.webp'><p>Limão</p></td>
  </tr></tbody></table>
  <h3>Notas de Coração</h3>
  <table><tbody><tr>
    <td><p>Jasmim</p></td>
  </tr></tbody></table>
  <h3>Notas de Base</h3>
  <table><tbody><tr></tr></tbody></table>
</div>
<p>rodapé</p>
</article>"#;

    #[test]
    fn extracts_all_tiers_in_document_order() {
        let pyramid = extract_pyramid(SAMPLE);

        let top: Vec<&str> = pyramid.top.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(top, vec!["Bergamota", "Limão"]);
        assert_eq!(
            pyramid.top[0].image_url,
            "https://cdn.perfumaria.app/notas/bergamota.webp"
        );
        assert_eq!(
            pyramid.top[1].image_url,
            "https://cdn.perfumaria.app/notas/limao.webp"
        );

        assert_eq!(pyramid.heart.len(), 1);
        assert_eq!(pyramid.heart[0].name, "Jasmim");
        assert_eq!(pyramid.heart[0].image_url, "");

        assert!(pyramid.base.is_empty());
    }

    #[test]
    fn tolerates_arbitrary_input_without_panicking() {
        assert!(extract_pyramid("").is_empty());
        assert!(extract_pyramid("<div>not a pyramid</div>").is_empty());
        assert!(extract_pyramid("<<<>>><td><img").is_empty());
        assert!(extract_pyramid("texto solto sem marcação").is_empty());
    }

    #[test]
    fn missing_heading_empties_only_that_tier() {
        let html = r#"<div id="piramide-olfativa">
            <h3>Notas de Topo</h3>
            <table><tr><td><p>Bergamota</p></td></tr></table>
        </div>"#;
        let pyramid = extract_pyramid(html);

        assert_eq!(pyramid.top.len(), 1);
        assert!(pyramid.heart.is_empty());
        assert!(pyramid.base.is_empty());
    }

    #[test]
    fn first_matching_heading_wins() {
        let html = r#"<div id="piramide-olfativa">
            <h3>Notas de Topo</h3>
            <table><tr><td><p>Primeira</p></td></tr></table>
            <h3>Notas de Topo (antigas)</h3>
            <table><tr><td><p>Segunda</p></td></tr></table>
        </div>"#;
        let pyramid = extract_pyramid(html);

        assert_eq!(pyramid.top.len(), 1);
        assert_eq!(pyramid.top[0].name, "Primeira");
    }

    #[test]
    fn heading_without_sibling_table_yields_empty_tier() {
        let html = r#"<div id="piramide-olfativa">
            <h3>Notas de Topo</h3>
            <p>tabela removida</p>
            <table><tr><td><p>Perdida</p></td></tr></table>
        </div>"#;
        let pyramid = extract_pyramid(html);

        assert!(pyramid.top.is_empty());
    }

    #[test]
    fn cells_without_name_are_dropped() {
        let html = r#"<div id="piramide-olfativa">
            <h3>Notas de Topo</h3>
            <table><tr>
                <td><img src="a.webp"><p>   </p></td>
                <td><img src="b.webp"><p>Rosa</p></td>
            </tr></table>
        </div>"#;
        let pyramid = extract_pyramid(html);

        assert_eq!(pyramid.top.len(), 1);
        assert_eq!(pyramid.top[0].name, "Rosa");
        assert_eq!(pyramid.top[0].image_url, "b.webp");
    }

    #[test]
    fn cell_name_falls_back_to_stripped_cell_text() {
        let html = r#"<div id="piramide-olfativa">
            <h3>Notas de Coração</h3>
            <table><tr><td><span>Flor de Laranjeira</span></td></tr></table>
        </div>"#;
        let pyramid = extract_pyramid(html);

        assert_eq!(pyramid.heart[0].name, "Flor de Laranjeira");
    }

    #[test]
    fn container_match_tolerates_quote_style_case_and_extra_attributes() {
        for html in [
            r#"<DIV ID='piramide-olfativa'><h3>Notas de Base</h3><table><tr><td><p>Cedro</p></td></tr></table></DIV>"#,
            r#"<div data-x="1" id=piramide-olfativa class="cms"><h3>Notas de Base</h3><table><tr><td><p>Cedro</p></td></tr></table></div>"#,
        ] {
            let pyramid = extract_pyramid(html);
            assert_eq!(pyramid.base.len(), 1, "falhou para {html}");
            assert_eq!(pyramid.base[0].name, "Cedro");
        }
    }

    #[test]
    fn heading_text_match_is_substring_based() {
        let html = r#"<div id="piramide-olfativa">
            <h2><strong>Pirâmide: Notas de Topo</strong></h2>
            <table><tr><td><p>Bergamota</p></td></tr></table>
        </div>"#;
        let pyramid = extract_pyramid(html);

        assert_eq!(pyramid.top.len(), 1);
    }

    #[test]
    fn locate_container_spans_opening_through_first_close() {
        let html = r#"antes <div id="piramide-olfativa"><h3>x</h3></div> depois"#;
        let span = locate_container(html).expect("container presente");
        assert_eq!(&html[..span.start], "antes ");
        assert_eq!(&html[span.end..], " depois");
    }

    #[test]
    fn entities_in_names_are_decoded() {
        let html = r#"<div id="piramide-olfativa">
            <h3>Notas de Topo</h3>
            <table><tr><td><p>&Acirc;mbar &amp; Cedro</p></td></tr></table>
        </div>"#;
        let pyramid = extract_pyramid(html);

        assert_eq!(pyramid.top[0].name, "Âmbar & Cedro");
    }
}
