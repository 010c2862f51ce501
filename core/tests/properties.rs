use rayon::prelude::*;

use smartman_core::{
    AnnotatedLine, ExamplePair, Fragment, FragmentKind, LineMode, MAX_EXAMPLES, ManPage,
    annotate, extract_examples, is_section_header, project_page, segment,
};

const GREP_PAGE: &str = "\
GREP(1)                   User Commands                  GREP(1)

NAME
       grep, egrep, fgrep - print lines that match patterns

SYNOPSIS
       grep [OPTION...] PATTERNS [FILE...]
       grep [OPTION...] -e PATTERNS ... [FILE...]

DESCRIPTION
       grep searches for PATTERNS in each FILE.

OPTIONS
   Generic Program Information
       --help Output a usage message and exit.

       -V, --version
              Output the version number of grep and exit.

   Matching Control
       -i, --ignore-case
              Ignore case distinctions in patterns and input data.

EXIT STATUS
       Normally the exit status is 0 if a line is selected.

SEE ALSO
       awk(1), sed(1)

GNU grep 3.11             2023-04-24                     GREP(1)
";

fn awkward_inputs() -> Vec<String> {
    vec![
        String::new(),
        "   \n\t\n  ".to_string(),
        "\u{0}\u{8}\u{1b}[1mNAME\u{1b}[0m\n".to_string(),
        "N\u{8}NA\u{8}AM\u{8}ME\u{8}E\n  body\n".to_string(),
        "\r\n\r\nNAME\r\n  crlf body\r\n".to_string(),
        "----\n- -\nÄÖÜ\n  umlaut section\n".to_string(),
        "\u{feff}NAME\n  bom\n".to_string(),
        "NAME\u{0c}  ff body\rSYNOPSIS\r  cr body\u{2028}SEE ALSO\u{85}  x(1)".to_string(),
        "\tOPTIONS\n  -a\nÉTÉ\n  accented\n".to_string(),
        "x".repeat(10_000),
        GREP_PAGE.to_string(),
    ]
}

#[test]
fn segmentation_scenario() {
    let raw = "NAME\n    foo - does a thing\nSYNOPSIS\n    foo [-x] FILE\n";
    let sections = segment(raw);

    assert_eq!(sections.len(), 2);
    assert_eq!(sections.get("NAME"), Some("foo - does a thing"));
    assert_eq!(sections.get("SYNOPSIS"), Some("foo [-x] FILE"));
}

#[test]
fn example_extraction_scenario() {
    let body = "Create a backup\n       foo -b file.txt\nRemove old logs\n       foo -r --all\n";
    assert_eq!(
        extract_examples(body),
        vec![
            ExamplePair::new("Create a backup", "foo -b file.txt"),
            ExamplePair::new("Remove old logs", "foo -r --all"),
        ]
    );
}

#[test]
fn flag_detection_scenario() {
    let line = annotate("-v --verbose FILE", LineMode::Body, None);
    assert_eq!(
        line.fragments,
        vec![
            Fragment::flag("-v"),
            Fragment::plain(" "),
            Fragment::flag("--verbose"),
            Fragment::plain(" FILE"),
        ]
    );
}

#[test]
fn search_overlay_scenario() {
    let line = annotate("use --force now", LineMode::Body, Some("force"));
    let matches: Vec<&Fragment> = line
        .fragments
        .iter()
        .filter(|f| f.kind == FragmentKind::Match)
        .collect();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].text, "force");
    assert!(line.fragments.contains(&Fragment::flag("--")));
}

#[test]
fn segmentation_is_idempotent() {
    for raw in awkward_inputs() {
        assert_eq!(segment(&raw), segment(&raw));
    }
}

#[test]
fn every_key_is_a_header() {
    let sections = segment(GREP_PAGE);
    assert!(!sections.is_empty());
    for name in sections.names() {
        assert!(is_section_header(name), "{name:?} is not a header");
    }
    assert_eq!(
        sections.names().collect::<Vec<_>>(),
        vec!["NAME", "SYNOPSIS", "DESCRIPTION", "OPTIONS", "EXIT STATUS", "SEE ALSO"]
    );
}

#[test]
fn every_key_is_a_header_for_awkward_input() {
    for raw in awkward_inputs() {
        for name in segment(&raw).names() {
            assert!(is_section_header(name), "{name:?} from {raw:?} is not a header");
        }
    }
}

#[test]
fn lookup_ignores_case_for_every_section() {
    let page = ManPage::parse("grep", GREP_PAGE);
    for (name, body) in page.sections().iter() {
        assert_eq!(page.section(&name.to_uppercase()), body);
        assert_eq!(page.section(&name.to_lowercase()), body);
    }
}

#[test]
fn running_footer_stays_in_last_section() {
    let page = ManPage::parse("grep", GREP_PAGE);
    assert!(page.section("SEE ALSO").starts_with("awk(1), sed(1)"));
    assert!(page.section("SEE ALSO").ends_with("GREP(1)"));
}

#[test]
fn example_count_is_bounded() {
    let mut body = String::new();
    for i in 0..50 {
        body.push_str(&format!("Step {i}\n\tfoo --step {i}\n\n"));
    }
    let examples = extract_examples(&body);
    assert_eq!(examples.len(), MAX_EXAMPLES);
    assert_eq!(examples[0].description, "Step 0");
}

#[test]
fn no_input_panics() {
    for raw in awkward_inputs() {
        let page = ManPage::parse("x", raw.as_str());
        let _ = page.examples();
        let _ = extract_examples(&raw);
        for line in raw.lines() {
            let annotated = annotate(line, LineMode::Synopsis, Some("\u{8}"));
            assert_eq!(annotated.text(), line);
            let annotated = annotate(line, LineMode::Body, None);
            assert_eq!(annotated.text(), line);
        }
    }
}

fn annotate_page(raw: &str) -> Vec<AnnotatedLine> {
    raw.lines()
        .flat_map(|line| {
            [
                annotate(line, LineMode::Synopsis, None),
                annotate(line, LineMode::Body, Some("a")),
            ]
        })
        .collect()
}

#[test]
fn concurrent_use_matches_sequential() {
    let inputs = awkward_inputs();
    let sequential: Vec<_> = inputs
        .iter()
        .map(|raw| {
            let page = ManPage::parse("x", raw.as_str());
            (
                page.sections().clone(),
                page.examples(),
                project_page(&page, Some("a")),
                annotate_page(raw),
            )
        })
        .collect();

    let parallel: Vec<_> = (0..32 * inputs.len())
        .into_par_iter()
        .map(|i| {
            let raw = &inputs[i % inputs.len()];
            let page = ManPage::parse("x", raw.as_str());
            (
                i,
                page.sections().clone(),
                page.examples(),
                project_page(&page, Some("a")),
                annotate_page(raw),
            )
        })
        .collect();

    for (i, sections, examples, views, annotated) in parallel {
        let (expected_sections, expected_examples, expected_views, expected_annotated) =
            &sequential[i % inputs.len()];
        assert_eq!(&sections, expected_sections);
        assert_eq!(&examples, expected_examples);
        assert_eq!(&views, expected_views);
        assert_eq!(&annotated, expected_annotated);
    }
}
