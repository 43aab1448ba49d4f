use ci4forge::{
    DuplicatePolicy, FileRecord, ForgeBuilder, ForgeError, GenerationOutput, MarkerScanner,
    NodeKind, TreeStats, build_file_tree, build_file_tree_with, count_nodes, default_selection,
    find_node, flatten_tree, format_application_code, parse_application_code,
    parse_application_code_with, render_tree,
};
fn records(items: &[(&str, &str)]) -> Vec<FileRecord> {
    items
        .iter()
        .map(|(path, content)| FileRecord::new(*path, *content))
        .collect()
}
fn names(nodes: &[ci4forge::TreeNode]) -> Vec<&str> {
    nodes.iter().map(|n| n.name.as_str()).collect()
}
#[test]
fn test_empty_tree() {
    assert!(build_file_tree(&[]).is_empty());
}
#[test]
fn test_folders_before_files_per_level() {
    let files = records(&[("b/x.txt", "x"), ("a.txt", "a"), ("b/a.txt", "ba")]);
    let tree = build_file_tree(&files);
    assert_eq!(names(&tree), vec!["b", "a.txt"]);
    assert_eq!(tree[0].kind, NodeKind::Folder);
    assert_eq!(tree[1].kind, NodeKind::File);
    assert_eq!(names(tree[0].children()), vec!["a.txt", "x.txt"]);
}
#[test]
fn test_single_segment_is_root_file() {
    let tree = build_file_tree(&records(&[(".env", "CI_ENVIRONMENT = development")]));
    assert_eq!(tree.len(), 1);
    assert_eq!(tree[0].kind, NodeKind::File);
    assert_eq!(tree[0].id, "root/.env");
    assert_eq!(tree[0].path, ".env");
    assert_eq!(tree[0].content.as_deref(), Some("CI_ENVIRONMENT = development"));
    assert!(tree[0].children.is_none());
}
#[test]
fn test_ids_and_paths() {
    let tree = build_file_tree(&records(&[("app/Controllers/Home.php", "<?php")]));
    let app = &tree[0];
    assert_eq!((app.id.as_str(), app.path.as_str()), ("root/app", "app"));
    assert!(app.content.is_none());
    let controllers = &app.children()[0];
    assert_eq!(controllers.id, "root/app/Controllers");
    assert_eq!(controllers.path, "app/Controllers");
    let home = &controllers.children()[0];
    assert_eq!(home.id, "root/app/Controllers/Home.php");
    assert_eq!(home.path, "app/Controllers/Home.php");
    assert_eq!(home.name, "Home.php");
}
#[test]
fn test_duplicate_first_wins_by_default() {
    let files = records(&[("app/a.php", "first"), ("app/a.php", "second")]);
    let tree = build_file_tree(&files);
    let node = find_node(&tree, "app/a.php").unwrap();
    assert_eq!(node.content.as_deref(), Some("first"));
    assert_eq!(tree[0].children().len(), 1);
}
#[test]
fn test_duplicate_last_wins() {
    let files = records(&[("app/a.php", "first"), ("app/a.php", "second")]);
    let options = ForgeBuilder::new(".")
        .duplicate_policy(DuplicatePolicy::LastWins)
        .build();
    let tree = build_file_tree_with(&files, &options);
    let node = find_node(&tree, "app/a.php").unwrap();
    assert_eq!(node.content.as_deref(), Some("second"));
}
#[test]
fn test_file_folder_conflict_first_seen_wins() {
    let tree = build_file_tree(&records(&[("app", "file"), ("app/a.php", "a")]));
    assert_eq!(tree.len(), 1);
    assert_eq!(tree[0].kind, NodeKind::File);
    assert_eq!(tree[0].content.as_deref(), Some("file"));

    let tree = build_file_tree(&records(&[("app/a.php", "a"), ("app", "file")]));
    assert_eq!(tree.len(), 1);
    assert_eq!(tree[0].kind, NodeKind::Folder);
    assert_eq!(names(tree[0].children()), vec!["a.php"]);
}
#[test]
fn test_leading_slash_kept_unless_trimmed() {
    let files = records(&[("/index.php", "<?php")]);
    let tree = build_file_tree(&files);
    assert_eq!(tree[0].name, "");
    assert_eq!(tree[0].kind, NodeKind::Folder);
    assert_eq!(tree[0].children()[0].path, "/index.php");

    let options = ForgeBuilder::new(".").trim_slashes(true).build();
    let tree = build_file_tree_with(&files, &options);
    assert_eq!(tree[0].name, "index.php");
    assert_eq!(tree[0].kind, NodeKind::File);
}
#[test]
fn test_flatten_returns_files_in_display_order() {
    let files = records(&[("z.php", "z"), ("app/b.php", "b"), ("app/a.php", "a")]);
    let flat = flatten_tree(&build_file_tree(&files));
    let paths: Vec<_> = flat.iter().map(|f| f.path.as_str()).collect();
    assert_eq!(paths, vec!["app/a.php", "app/b.php", "z.php"]);
    assert_eq!(flat[0].content, "a");
}
#[test]
fn test_find_node_missing() {
    let tree = build_file_tree(&records(&[("app/a.php", "a")]));
    assert!(find_node(&tree, "app/b.php").is_none());
    assert!(find_node(&tree, "app/a.php/x").is_none());
    assert_eq!(find_node(&tree, "app").unwrap().kind, NodeKind::Folder);
}
#[test]
fn test_default_selection() {
    let tree = build_file_tree(&records(&[("README.md", "readme"), ("env", "e")]));
    assert_eq!(default_selection(&tree).unwrap().path, "README.md");

    let tree = build_file_tree(&records(&[("app/Home.php", "home"), ("z.php", "z")]));
    assert_eq!(default_selection(&tree).unwrap().path, "app/Home.php");

    let tree = build_file_tree(&records(&[("app/Controllers/Home.php", "home")]));
    assert!(default_selection(&tree).is_none());

    assert!(default_selection(&[]).is_none());
}
#[test]
fn test_count_nodes() {
    let tree = build_file_tree(&records(&[
        ("app/Controllers/Home.php", "h"),
        ("app/Config/Routes.php", "r"),
        (".env", "e"),
    ]));
    assert_eq!(
        count_nodes(&tree),
        TreeStats {
            folders: 3,
            files: 3
        }
    );
}
#[test]
fn test_render_tree() {
    let tree = build_file_tree(&records(&[
        ("app/Controllers/Home.php", "h"),
        ("app/Config/Routes.php", "r"),
        (".env", "e"),
    ]));
    let expected = "\
.
├── app/
│   ├── Config/
│   │   └── Routes.php
│   └── Controllers/
│       └── Home.php
└── .env";
    assert_eq!(render_tree(&tree), expected);
    assert_eq!(render_tree(&[]), ".");
}
#[test]
fn test_parse_empty_blob() {
    assert!(parse_application_code("").is_empty());
    assert!(parse_application_code(" \n\t\n").is_empty());
}
#[test]
fn test_parse_fallback_without_markers() {
    let files = parse_application_code("  no markers here\n");
    assert_eq!(files, records(&[("application_output.txt", "no markers here")]));
}
#[test]
fn test_parse_fallback_path_option() {
    let options = ForgeBuilder::new(".").fallback_path("output.php").build();
    let files = parse_application_code_with("<?php echo 1;", &options);
    assert_eq!(files, records(&[("output.php", "<?php echo 1;")]));
}
#[test]
fn test_parse_mixed_marker_styles() {
    let files = parse_application_code("// File: a.php\nfoo\n/* File: b.php */\nbar");
    assert_eq!(files, records(&[("a.php", "foo"), ("b.php", "bar")]));
}
#[test]
fn test_parse_crlf_and_nested_paths() {
    let blob = "Here is your app:\r\n// File: app/Controllers/Home.php\r\n<?php\r\nclass Home {}\r\n\r\n// File: app/Views/welcome_message.php\r\n<h1>Hi</h1>\r\n";
    let files = parse_application_code(blob);
    assert_eq!(
        files,
        records(&[
            ("app/Controllers/Home.php", "<?php\r\nclass Home {}"),
            ("app/Views/welcome_message.php", "<h1>Hi</h1>"),
        ])
    );
}
#[test]
fn test_parse_skips_empty_content() {
    let files = parse_application_code("// File: empty.php\n\n   \n// File: full.php\nx\n");
    assert_eq!(files, records(&[("full.php", "x")]));
}
#[test]
fn test_parse_malformed_marker_ends_previous_file() {
    let blob = "// File: a.php\nfoo\n// File: broken path here\nbar\n// File: c.php\nbaz";
    let files = parse_application_code(blob);
    assert_eq!(files, records(&[("a.php", "foo"), ("c.php", "baz")]));
}
#[test]
fn test_parse_marker_requires_newline() {
    let files = parse_application_code("// File: a.php");
    assert_eq!(files, records(&[("application_output.txt", "// File: a.php")]));
}
#[test]
fn test_parse_block_marker_without_closing() {
    let files = parse_application_code("/* File: a.php\nx");
    assert_eq!(files, records(&[("a.php", "x")]));
}
#[test]
fn test_parse_block_marker_with_trailing_text_falls_back() {
    let blob = "/* File: a.php */ trailing\nx";
    let files = parse_application_code(blob);
    assert_eq!(files, records(&[("application_output.txt", blob)]));
}
#[test]
fn test_parse_keeps_ordinary_comments() {
    let blob = "// File: app/Config/Routes.php\n<?php\n// Default route\n/* keep me */\n$routes->get('/', 'Home::index');\n";
    let files = parse_application_code(blob);
    assert_eq!(files.len(), 1);
    assert!(files[0].content.contains("// Default route"));
    assert!(files[0].content.contains("/* keep me */"));
}
#[test]
fn test_marker_scanner_yields_empty_entries() {
    let found: Vec<_> = MarkerScanner::new("// File: a.php\n// File: b.php\nbody").collect();
    assert_eq!(found, vec![("a.php", ""), ("b.php", "body")]);
}
#[test]
fn test_format_application_code_reparses() {
    let files = records(&[
        ("app/Controllers/Home.php", "<?php\nclass Home {}"),
        (".env", "CI_ENVIRONMENT = development\n"),
    ]);
    let blob = format_application_code(&files);
    assert!(blob.starts_with("// File: app/Controllers/Home.php\n<?php\n"));
    let parsed = parse_application_code(&blob);
    assert_eq!(parsed[0], files[0]);
    assert_eq!(parsed[1].content, "CI_ENVIRONMENT = development");
}
#[test]
fn test_generation_output_files_pass_through() {
    let files = records(&[("b.php", "b"), ("a.php", "a")]);
    let options = ForgeBuilder::new(".").build();
    let out = GenerationOutput::Files(files.clone())
        .into_records(&options)
        .unwrap();
    assert_eq!(out, files);
}
#[test]
fn test_generation_output_ignore_patterns() {
    let options = ForgeBuilder::new(".")
        .ignore_patterns(vec!["*.md".into(), "tests/**".into()])
        .build();
    let blob = "// File: README.md\nhi\n// File: app/a.php\na\n// File: tests/t.php\nt\n";
    let out = GenerationOutput::Blob(blob.into())
        .into_records(&options)
        .unwrap();
    assert_eq!(out, records(&[("app/a.php", "a")]));
}
#[test]
fn test_invalid_ignore_pattern() {
    let options = ForgeBuilder::new(".")
        .ignore_patterns(vec!["a[".into()])
        .build();
    let err = GenerationOutput::Files(Vec::new())
        .into_records(&options)
        .unwrap_err();
    assert!(matches!(err, ForgeError::InvalidPattern(_)));
}
#[test]
fn test_tree_node_json_shape() {
    let tree = build_file_tree(&records(&[("app/a.php", "a")]));
    let json = serde_json::to_value(&tree).unwrap();
    assert_eq!(json[0]["kind"], "folder");
    assert!(json[0].get("content").is_none());
    assert_eq!(json[0]["children"][0]["kind"], "file");
    assert_eq!(json[0]["children"][0]["content"], "a");
    assert!(json[0]["children"][0].get("children").is_none());
}
