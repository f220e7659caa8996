use atlas::models::ProjectRecord;
use atlas::parser::parse_registry;
use speculate2::speculate;

const WIDGET: &str = r#"projects:
  widget:
    path: "/home/dev/widget"
    repo: "git@example.com:acme/widget.git"
    additional_paths:
      - "/home/dev/widget-docs"
"#;

speculate! {
    describe "parse_registry" {
        it "parses the widget scenario" {
            let records = parse_registry(WIDGET);
            assert_eq!(records, vec![ProjectRecord {
                slug: "widget".into(),
                path: "/home/dev/widget".into(),
                repo: "git@example.com:acme/widget.git".into(),
                additional_paths: vec!["/home/dev/widget-docs".into()],
            }]);
        }

        it "returns nothing for empty text" {
            assert!(parse_registry("").is_empty());
            assert!(parse_registry("projects:\n").is_empty());
        }

        it "emits records in file order" {
            let text = "projects:\n  beta:\n    path: /b\n  alpha:\n    path: /a\n  gamma:\n";
            let slugs: Vec<_> = parse_registry(text).into_iter().map(|r| r.slug).collect();
            assert_eq!(slugs, vec!["beta", "alpha", "gamma"]);
        }

        it "defaults missing fields to empty" {
            let records = parse_registry("projects:\n  bare:\n");
            assert_eq!(records, vec![ProjectRecord::new("bare", "")]);
            assert!(!records[0].has_path());
        }

        it "accepts unquoted and single-quoted values" {
            let text = "projects:\n  app:\n    path: ~/code/app\n    repo: 'https://example.com/app'\n";
            let records = parse_registry(text);
            assert_eq!(records[0].path, "~/code/app");
            assert_eq!(records[0].repo, "https://example.com/app");
        }

        describe "additional_paths" {
            it "collects several items" {
                let text = "projects:\n  app:\n    additional_paths:\n      - /one\n      - \"/two\"\n    path: /app\n";
                let records = parse_registry(text);
                assert_eq!(records[0].additional_paths, vec!["/one", "/two"]);
                assert_eq!(records[0].path, "/app");
            }

            it "is closed by a blank line" {
                let text = "projects:\n  app:\n    additional_paths:\n      - /one\n\n      - /stray\n";
                let records = parse_registry(text);
                assert_eq!(records[0].additional_paths, vec!["/one"]);
            }

            it "is closed by a comment line" {
                let text = "projects:\n  app:\n    additional_paths:\n      - /one\n    # later\n      - /stray\n";
                let records = parse_registry(text);
                assert_eq!(records[0].additional_paths, vec!["/one"]);
            }

            it "is closed by the next project" {
                let text = "projects:\n  a:\n    additional_paths:\n      - /one\n  b:\n      - /stray\n";
                let records = parse_registry(text);
                assert_eq!(records[0].additional_paths, vec!["/one"]);
                assert!(records[1].additional_paths.is_empty());
            }

            it "does not close the record" {
                let text = "projects:\n  a:\n    additional_paths:\n      - /one\n\n    repo: r\n";
                let records = parse_registry(text);
                assert_eq!(records.len(), 1);
                assert_eq!(records[0].repo, "r");
            }
        }

        describe "malformed lines" {
            it "skips lines before the first project" {
                let text = "    path: /orphan\nprojects:\n  a:\n    path: /a\n";
                let records = parse_registry(text);
                assert_eq!(records.len(), 1);
                assert_eq!(records[0].path, "/a");
            }

            it "skips slugs with invalid characters and keeps the previous record open" {
                let text = "projects:\n  good:\n    path: /good\n  bad slug:\n    path: /bad\n";
                let records = parse_registry(text);
                assert_eq!(records.len(), 1);
                assert_eq!(records[0].path, "/bad");
            }
        }
    }
}
