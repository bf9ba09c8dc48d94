//! User-Agent Stylesheet
//!
//! [WHATWG HTML § 15 Rendering](https://html.spec.whatwg.org/multipage/rendering.html)
//!
//! "User agents are expected to have a default style sheet that presents
//! elements of HTML documents in ways consistent with general user
//! expectations."
//!
//! [CSS Cascading § 6.1 Cascade Sorting Order](https://www.w3.org/TR/css-cascade-4/#cascade-sort)
//!
//! UA rules have the lowest priority in the cascade — any author rule
//! overrides a UA rule regardless of specificity.

use std::sync::OnceLock;

use crate::parser::{CssParser, Stylesheet};
use crate::tokenizer::CssTokenizer;

/// [WHATWG HTML § 15.3 Rendering — Suggested default style sheet](https://html.spec.whatwg.org/multipage/rendering.html#the-css-user-agent-style-sheet-and-presentational-hints)
///
/// A subset of the suggested UA stylesheet covering the elements and
/// properties this engine lays out.
const UA_CSS: &str = r"
/* [§ 15.3.1 Hidden elements](https://html.spec.whatwg.org/multipage/rendering.html#hidden-elements) */
/* 'The following elements must have their display property set to none.' */
area, base, basefont, datalist, head, link, meta, noembed,
noframes, param, rp, script, style, template, title {
    display: none;
}

/* [§ 15.3.3 Flow content](https://html.spec.whatwg.org/multipage/rendering.html#flow-content-3) */
/* 'The following elements must have their display property set to block.' */
address, article, aside, blockquote, body, center, dd, details,
dialog, dir, div, dl, dt, fieldset, figcaption, figure, footer,
form, h1, h2, h3, h4, h5, h6, header, hgroup, hr, html, legend,
li, listing, main, menu, nav, ol, p, plaintext, pre, search,
section, summary, ul, xmp {
    display: block;
}

/* [§ 15.3.4 The page](https://html.spec.whatwg.org/multipage/rendering.html#the-page) */
/* 'body { margin: 8px; }' */
body {
    margin: 8px;
}

/* [§ 15.3.6 Sections and headings](https://html.spec.whatwg.org/multipage/rendering.html#sections-and-headings) */
h1 {
    font-size: 2em;
    font-weight: bold;
    margin: 0.67em 0;
}

h2 {
    font-size: 1.5em;
    font-weight: bold;
    margin: 0.83em 0;
}

h3 {
    font-size: 1.17em;
    font-weight: bold;
    margin: 1em 0;
}

h4 {
    font-weight: bold;
    margin: 1.33em 0;
}

h5 {
    font-size: 0.83em;
    font-weight: bold;
    margin: 1.67em 0;
}

h6 {
    font-size: 0.67em;
    font-weight: bold;
    margin: 2.33em 0;
}

/* [§ 15.3.5 Grouping content](https://html.spec.whatwg.org/multipage/rendering.html#grouping-content) */
p, blockquote, figure, listing, plaintext, pre, xmp {
    margin-top: 1em;
    margin-bottom: 1em;
}

blockquote, figure {
    margin-left: 40px;
    margin-right: 40px;
}

/* [§ 15.3.7 Lists](https://html.spec.whatwg.org/multipage/rendering.html#lists) */
ol, ul, menu {
    margin-top: 1em;
    margin-bottom: 1em;
    padding-left: 40px;
}

/* [§ 15.3.8 Text-level semantics](https://html.spec.whatwg.org/multipage/rendering.html#text-level-semantics) */
/* 'b, strong { font-weight: bolder; }' */
b, strong {
    font-weight: bolder;
}

/* [§ 15.3.10 Tables](https://html.spec.whatwg.org/multipage/rendering.html#tables-2) */
td, th {
    padding: 1px;
}

th {
    font-weight: bold;
    text-align: center;
}

/* [§ 15.5.12-15.5.15 Form controls](https://html.spec.whatwg.org/multipage/rendering.html#the-input-element-as-a-form-control) */
input, textarea, select, button {
    display: inline-block;
    padding: 1px 2px;
}

button {
    padding: 1px 6px;
    text-align: center;
}
";

/// Return the parsed UA stylesheet, parsing only once.
pub fn ua_stylesheet() -> &'static Stylesheet {
    static STYLESHEET: OnceLock<Stylesheet> = OnceLock::new();
    STYLESHEET.get_or_init(|| {
        let mut tokenizer = CssTokenizer::new(UA_CSS);
        tokenizer.run();
        let mut parser = CssParser::new(tokenizer.into_tokens());
        parser.parse_stylesheet()
    })
}
