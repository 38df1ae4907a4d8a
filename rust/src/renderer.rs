use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::extractor::locate_container;
use crate::pyramid::{Pyramid, Tier};
use crate::PYRAMID_CONTAINER_ID;

/// Renderiza o bloco da pirâmide no formato fixo: por camada, um título
/// seguido de uma tabela de linha única com uma célula por nota, tudo
/// embrulhado no contêiner identificado. Função pura da pirâmide; a mesma
/// entrada produz sempre a mesma saída byte a byte.
pub fn render_pyramid_block(pyramid: &Pyramid) -> String {
    let mut out = String::new();
    out.push_str(&format!("<div id=\"{PYRAMID_CONTAINER_ID}\">\n"));

    for tier in Tier::ALL {
        out.push_str(&format!("  <h3>{}</h3>\n", encode_text(tier.label())));
        out.push_str("  <table>\n    <tbody>\n      <tr>\n");
        for note in pyramid.notes(tier) {
            let name_text = encode_text(&note.name);
            let name_attr = encode_double_quoted_attribute(&note.name);
            if note.image_url.is_empty() {
                out.push_str(&format!("        <td><p>{name_text}</p></td>\n"));
            } else {
                let src = encode_double_quoted_attribute(&note.image_url);
                out.push_str(&format!(
                    "        <td><img src=\"{src}\" alt=\"{name_attr}\"><p>{name_text}</p></td>\n"
                ));
            }
        }
        out.push_str("      </tr>\n    </tbody>\n  </table>\n");
    }

    out.push_str("</div>");
    out
}

/// Substitui o contêiner existente do documento pelo bloco recém-renderizado,
/// byte a byte fora do trecho casado. Sem contêiner no documento, o bloco é
/// anexado ao final com uma quebra de linha. Sempre produz um documento
/// completo.
///
/// Limitação conhecida: o casamento não guloso termina no primeiro </div>,
/// então um div aninhado dentro do contêiner original trunca a substituição.
pub fn splice_pyramid_block(document: &str, block: &str) -> String {
    match locate_container(document) {
        Some(span) => {
            let mut out = String::with_capacity(document.len() + block.len());
            out.push_str(&document[..span.start]);
            out.push_str(block);
            out.push_str(&document[span.end..]);
            out
        }
        None => format!("{document}\n{block}"),
    }
}
