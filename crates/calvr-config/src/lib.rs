//! Lexer, parser, and lookup tree for CalVR configuration files (`.cvrc`).
//!
//! This crate is dependency-free so configuration can be inspected by tools
//! without linking any kernel or GPU code.
//!
//! # Structure
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`error`] | `ParseError` |
//! | [`lexer`] | `Lexer`, `Token`, `Spanned` |
//! | [`parser`] | `parse_str` entry point |
//! | [`tree`] | `ConfigTree`, `Section`, `Entry`, `Value` |
//!
//! # Quick start
//!
//! ```rust
//! use calvr_config::parse_str;
//!
//! let src = r#"
//!     Zones { maxColumns: 8  maxRows: 2 }
//!     FrameRate { autoAdjust: true  target: 30 }
//! "#;
//!
//! let cfg = parse_str(src).unwrap();
//! assert_eq!(cfg.get_int("Zones.maxColumns", 16), 8);
//! assert_eq!(cfg.get_float("FrameRate.offset", 4.0), 4.0);
//! ```

pub mod error;
pub mod lexer;
pub mod parser;
pub mod tree;

pub use error::ParseError;
pub use parser::parse_str;
pub use tree::{ConfigTree, Entry, Section, Value};

#[cfg(test)]
mod parse_tests {
    use super::*;

    fn ok(src: &str) -> ConfigTree { parse_str(src).unwrap() }
    fn err(src: &str) -> ParseError { parse_str(src).unwrap_err() }

    #[test] fn empty_document() { assert!(ok("").root().entries.is_empty()); }
    #[test] fn comments_only() { ok("// nothing\n/* here */"); }

    #[test]
    fn top_level_property() {
        let cfg = ok("Orientation3d: false");
        assert!(!cfg.get_bool("Orientation3d", true));
    }

    #[test]
    fn nested_sections() {
        let cfg = ok("Screen { width: 1200  Channel { width: 1920 left: 0 } }");
        assert_eq!(cfg.get_float("Screen.width", 0.0), 1200.0);
        assert_eq!(cfg.get_int("Screen.Channel.width", 0), 1920);
        assert!(cfg.section("Screen.Channel").is_some());
    }

    #[test]
    fn later_duplicates_win() {
        let cfg = ok("Zones { maxRows: 2 } Zones { maxRows: 3 }");
        assert_eq!(cfg.get_int("Zones.maxRows", 4), 3);
    }

    #[test]
    fn lookup_falls_back_to_earlier_section() {
        let cfg = ok("Zones { maxRows: 2 } Zones { maxColumns: 5 }");
        assert_eq!(cfg.get_int("Zones.maxRows", 4), 2);
        assert_eq!(cfg.get_int("Zones.maxColumns", 16), 5);
    }

    #[test]
    fn merge_overrides() {
        let mut base = ok("FrameRate { target: 20 }");
        base.merge(ok("FrameRate { target: 60 }"));
        assert_eq!(base.get_float("FrameRate.target", 0.0), 60.0);
    }

    #[test]
    fn wrong_kind_uses_default() {
        let cfg = ok(r#"Zones { maxRows: "many"  maxColumns: 2.5 }"#);
        assert_eq!(cfg.get_int("Zones.maxRows", 4), 4);
        assert_eq!(cfg.get_int("Zones.maxColumns", 16), 16);
        assert_eq!(cfg.try_float("Zones.maxColumns"), Some(2.5));
    }

    #[test]
    fn bool_spellings() {
        let cfg = ok("a: on  b: no  c: 1  d: TRUE  e: maybe");
        assert_eq!(cfg.try_bool("a"), Some(true));
        assert_eq!(cfg.try_bool("b"), Some(false));
        assert_eq!(cfg.try_bool("c"), Some(true));
        assert_eq!(cfg.try_bool("d"), Some(true));
        assert_eq!(cfg.try_bool("e"), None);
    }

    #[test]
    fn strings_idents_colors() {
        let cfg = ok(r#"Stereo { mode: left  clearColor: #00000000  label: "front wall" }"#);
        assert_eq!(cfg.get_str("Stereo.mode", "interlaced"), "left");
        assert_eq!(cfg.get_color("Stereo.clearColor", [1, 1, 1, 1]), [0, 0, 0, 0]);
        assert_eq!(cfg.try_str("Stereo.label"), Some("front wall"));
    }

    #[test]
    fn value_path_does_not_match_section() {
        let cfg = ok("Zones { maxRows: 2 }");
        assert!(cfg.get("Zones").is_none());
        assert!(cfg.get("Zones.maxRows.deeper").is_none());
    }

    #[test] fn err_unclosed_section() { err("Zones { maxRows: 2"); }
    #[test] fn err_stray_brace() { err("}"); }
    #[test] fn err_double_colon() { err("Zones { maxRows: : 2 }"); }
    #[test] fn err_missing_value() { err("Zones { maxRows: }"); }

    #[test]
    fn err_reports_position() {
        let e = err("Zones {\n  maxRows 2\n}");
        assert_eq!(e.line, 2);
    }
}
