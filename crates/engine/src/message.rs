// SPDX-FileCopyrightText: 2024 Robin Vobruba <hoijui.quaero@gmail.com>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

use oxrdf::{NamedNode, Term};

/// How a term shows up in a human readable message:
/// literals by their lexical form, everything else in N-Triples syntax.
fn display(term: &Term) -> String {
    match term {
        Term::Literal(literal) => literal.value().to_owned(),
        Term::NamedNode(_) | Term::BlankNode(_) | Term::Triple(_) => term.to_string(),
    }
}

/// Fills in a `sh:message` template.
///
/// Recognizes `{$this}`, `{$value}` and `{$path}`,
/// each also in the `{?var}` form.
/// Placeholders without a value are left as they are.
#[must_use]
pub fn render(template: &str, focus: &Term, value: Option<&Term>, path: Option<&NamedNode>) -> String {
    let mut message = template.to_owned();
    let focus_str = display(focus);
    for placeholder in ["{$this}", "{?this}"] {
        message = message.replace(placeholder, &focus_str);
    }
    if let Some(value) = value {
        let value_str = display(value);
        for placeholder in ["{$value}", "{?value}"] {
            message = message.replace(placeholder, &value_str);
        }
    }
    if let Some(path) = path {
        let path_str = path.to_string();
        for placeholder in ["{$path}", "{?path}"] {
            message = message.replace(placeholder, &path_str);
        }
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxrdf::Literal;

    #[test]
    fn placeholders() {
        let focus = Term::from(NamedNode::new_unchecked("http://example.org/x"));
        let value = Term::from(Literal::new_simple_literal("300"));
        let path = NamedNode::new_unchecked("http://example.org/port");
        assert_eq!(
            render("{$this} has {?value} on {$path}", &focus, Some(&value), Some(&path)),
            "<http://example.org/x> has 300 on <http://example.org/port>"
        );
        assert_eq!(render("bad {$value}", &focus, None, None), "bad {$value}");
    }
}
