//! Integration tests for walking a document with a compiled selector.

use mechanize_dom::{DomTree, ElementData, NodeId, NodeType};
use mechanize_html::parse_document;
use mechanize_query::compiler::{Chain, compile};
use mechanize_query::error::QueryError;
use mechanize_query::matcher::TermSpec;
use mechanize_query::walker::{
    MatchMode, MatchOptions, find_all, find_all_from, find_all_with, select,
};
use quickcheck_macros::quickcheck;

const FIXTURE: &str = include_str!("fixtures/repository.html");

fn element(tree: &mut DomTree, parent: NodeId, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
    let data = attrs
        .iter()
        .fold(ElementData::new(tag), |data, (k, v)| data.with_attr(*k, *v));
    let id = tree.alloc(NodeType::Element(data));
    tree.append_child(parent, id);
    id
}

/// The nodes of the sample page built by [`sample`].
struct Sample {
    tree: DomTree,
    html: NodeId,
    nav: NodeId,
    list: NodeId,
    outer_item: NodeId,
    nested_item: NodeId,
    last_item: NodeId,
    intro: NodeId,
}

/// ```text
/// html
///   body
///     div.navbar
///       ul
///         li.item
///           li.item.inner
///         li.item
///     p#intro
///       "Welcome"
/// ```
fn sample() -> Sample {
    let mut tree = DomTree::new();
    let root = tree.root();
    let html = element(&mut tree, root, "html", &[]);
    let body = element(&mut tree, html, "body", &[]);
    let nav = element(&mut tree, body, "div", &[("class", "navbar")]);
    let list = element(&mut tree, nav, "ul", &[]);
    let outer_item = element(&mut tree, list, "li", &[("class", "item")]);
    let nested_item = element(&mut tree, outer_item, "li", &[("class", "item inner")]);
    let last_item = element(&mut tree, list, "li", &[("class", "item")]);
    let intro = element(&mut tree, body, "p", &[("id", "intro")]);
    let text = tree.alloc(NodeType::Text("Welcome".to_string()));
    tree.append_child(intro, text);

    Sample {
        tree,
        html,
        nav,
        list,
        outer_item,
        nested_item,
        last_item,
        intro,
    }
}

#[test]
fn test_single_term_does_not_rescan_matched_subtree() {
    let s = sample();
    let selection = select(&s.tree, "li");
    assert_eq!(selection.nodes(), &[s.outer_item, s.last_item]);
    assert!(!selection.contains(s.nested_item));
}

#[test]
fn test_wildcard_reports_outermost_elements() {
    let s = sample();
    assert_eq!(select(&s.tree, "*").nodes(), &[s.html]);
}

#[test]
fn test_id_selector() {
    let s = sample();
    assert_eq!(select(&s.tree, "#intro").nodes(), &[s.intro]);
    assert!(select(&s.tree, "#missing").is_empty());
    assert!(select(&s.tree, "#intr").is_empty());
}

#[test]
fn test_class_is_a_substring_match() {
    let s = sample();
    assert_eq!(select(&s.tree, ".nav").nodes(), &[s.nav]);
    assert_eq!(select(&s.tree, "li.inner").nodes(), &[s.nested_item]);
}

#[test]
fn test_descendant_chain_inclusive_mode() {
    let s = sample();
    let selection = select(&s.tree, "div li");
    assert_eq!(selection.nodes(), &[s.nav, s.outer_item, s.last_item]);
}

#[test]
fn test_descendant_chain_strict_mode() {
    let s = sample();
    let chain = compile("div li");
    let selection = find_all_with(&s.tree, &chain, MatchOptions::strict());
    assert_eq!(selection.nodes(), &[s.outer_item, s.last_item]);
}

#[test]
fn test_later_terms_only_match_below_earlier_ones() {
    let s = sample();
    // The paragraph is a sibling of the div, not a descendant.
    let chain = compile("div p");
    assert_eq!(find_all(&s.tree, &chain).nodes(), &[s.nav]);
    assert!(find_all_with(&s.tree, &chain, MatchOptions::strict()).is_empty());
}

#[test]
fn test_three_term_chain() {
    let s = sample();
    let chain = compile("body ul li");
    let strict = find_all_with(&s.tree, &chain, MatchOptions::strict());
    assert_eq!(strict.nodes(), &[s.outer_item, s.last_item]);
    let inclusive = find_all(&s.tree, &chain);
    assert_eq!(inclusive.len(), 4);
    assert!(inclusive.contains(s.list));
}

#[test]
fn test_sibling_subtrees_keep_their_position() {
    let mut tree = DomTree::new();
    let root = tree.root();
    let first = element(&mut tree, root, "section", &[]);
    let a = element(&mut tree, first, "a", &[]);
    let second = element(&mut tree, root, "section", &[]);
    let b = element(&mut tree, second, "a", &[]);
    let stray = element(&mut tree, root, "a", &[]);

    let chain = compile("section a");
    let strict = find_all_with(&tree, &chain, MatchOptions::strict());
    assert_eq!(strict.nodes(), &[a, b]);
    assert!(!strict.contains(stray));
}

#[test]
fn test_empty_chain_matches_nothing() {
    let s = sample();
    assert!(find_all(&s.tree, &Chain::default()).is_empty());
    assert!(select(&s.tree, "   ").is_empty());
}

#[test]
fn test_malformed_selectors_do_not_panic() {
    let s = sample();
    assert!(select(&s.tree, "#").is_empty());
    // "." compiles to a bare wildcard term.
    assert_eq!(select(&s.tree, ".").nodes(), &[s.html]);
    assert_eq!(select(&s.tree, "li >").nodes(), &[s.outer_item, s.last_item]);
}

#[test]
fn test_find_all_from_inner_node() {
    let s = sample();
    let chain = Chain::new(vec![TermSpec::element("li")]);
    let selection = find_all_from(&s.tree, s.outer_item, &chain, MatchOptions::default()).unwrap();
    // The starting node itself is tested first.
    assert_eq!(selection.nodes(), &[s.outer_item]);

    let chain = compile(".inner");
    let selection = find_all_from(&s.tree, s.outer_item, &chain, MatchOptions::default()).unwrap();
    assert_eq!(selection.nodes(), &[s.nested_item]);
}

#[test]
fn test_find_all_from_foreign_node() {
    let s = sample();
    let result = find_all_from(&s.tree, NodeId(999), &compile("li"), MatchOptions::default());
    assert!(matches!(result, Err(QueryError::NodeNotInTree(NodeId(999)))));
}

#[test]
fn test_selection_accessors() {
    let s = sample();
    let selection = select(&s.tree, "li");
    assert_eq!(selection.len(), 2);
    assert!(!selection.is_empty());
    assert_eq!(selection.first(), Some(s.outer_item));
    assert!(std::ptr::eq(selection.tree(), &s.tree));
    assert_eq!(selection.iter().collect::<Vec<_>>(), vec![s.outer_item, s.last_item]);
    assert_eq!((&selection).into_iter().count(), 2);

    let classes: Vec<_> = selection.elements().filter_map(|el| el.attr("class")).collect();
    assert_eq!(classes, ["item", "item"]);
    assert_eq!(selection.into_nodes(), vec![s.outer_item, s.last_item]);

    assert_eq!(select(&s.tree, "table").first(), None);
}

#[test]
fn test_options_default_to_inclusive() {
    assert_eq!(MatchOptions::default().mode, MatchMode::Inclusive);
    assert_eq!(MatchOptions::inclusive(), MatchOptions::default());
    assert_eq!(MatchOptions::strict().mode, MatchMode::Strict);
}

#[test]
fn test_fixture_clone_options() {
    let tree = parse_document(FIXTURE);
    let selection = select(&tree, "p.clone-options");
    assert_eq!(selection.len(), 1);
    let p = selection.elements().next().unwrap();
    assert_eq!(p.tag_name, "p");
    assert_eq!(p.attr("class"), Some("clone-options"));
}

#[test]
fn test_fixture_header_nav_items_in_document_order() {
    let tree = parse_document(FIXTURE);
    let selection = select(&tree, "li.header-nav-item");
    assert_eq!(selection.len(), 4);

    let hrefs: Vec<_> = selection
        .iter()
        .filter_map(|li| {
            tree.descendants(li)
                .find_map(|id| tree.as_element(id).and_then(|el| el.attr("href")))
        })
        .collect();
    assert_eq!(hrefs, ["/explore", "/features", "/enterprise", "/blog"]);
}

#[test]
fn test_fixture_id_lookup() {
    let tree = parse_document(FIXTURE);
    let selection = select(&tree, "#start-of-content");
    assert_eq!(selection.len(), 1);
    let div = selection.elements().next().unwrap();
    assert_eq!(div.tag_name, "div");
    assert_eq!(div.attr("class"), Some("accessibility-aid"));
}

#[test]
fn test_fixture_descendant_chains() {
    let tree = parse_document(FIXTURE);
    assert_eq!(select(&tree, "li").len(), 6);
    assert_eq!(select(&tree, "ul li").len(), 8);

    let strict = find_all_with(&tree, &compile("ul li"), MatchOptions::strict());
    assert_eq!(strict.len(), 6);
    let inputs = find_all_with(&tree, &compile("form input"), MatchOptions::strict());
    assert_eq!(inputs.len(), 4);
}

#[test]
fn test_fixture_wildcard_stops_at_html() {
    let tree = parse_document(FIXTURE);
    let selection = select(&tree, "*");
    assert_eq!(selection.len(), 1);
    assert_eq!(selection.elements().next().map(|el| el.tag_name.as_str()), Some("html"));
}

/// Build a tree from `(parent, tag)` seeds. Each seed attaches a new element
/// under one of the nodes created so far, the document included.
fn random_tree(seeds: &[(u8, u8)]) -> DomTree {
    const TAGS: [&str; 3] = ["div", "p", "li"];
    let mut tree = DomTree::new();
    let mut nodes = vec![tree.root()];
    for &(parent, tag) in seeds {
        let parent = nodes[usize::from(parent) % nodes.len()];
        let id = element(&mut tree, parent, TAGS[usize::from(tag) % TAGS.len()], &[]);
        nodes.push(id);
    }
    tree
}

fn has_ancestor_tagged(tree: &DomTree, node: NodeId, tag: Option<&str>) -> bool {
    let mut current = tree.parent(node);
    while let Some(id) = current {
        if tree
            .as_element(id)
            .is_some_and(|el| tag.is_none_or(|tag| el.tag_name == tag))
        {
            return true;
        }
        current = tree.parent(id);
    }
    false
}

fn expected(tree: &DomTree, tag: Option<&str>) -> Vec<NodeId> {
    tree.descendants(tree.root())
        .filter(|&id| {
            tree.as_element(id)
                .is_some_and(|el| tag.is_none_or(|tag| el.tag_name == tag))
        })
        .filter(|&id| !has_ancestor_tagged(tree, id, tag))
        .collect()
}

#[quickcheck]
fn prop_single_term_reports_outermost_matches(seeds: Vec<(u8, u8)>) -> bool {
    let tree = random_tree(&seeds);
    ["div", "p", "li"]
        .into_iter()
        .all(|tag| select(&tree, tag).nodes() == expected(&tree, Some(tag)).as_slice())
}

#[quickcheck]
fn prop_wildcard_reports_outermost_elements(seeds: Vec<(u8, u8)>) -> bool {
    let tree = random_tree(&seeds);
    select(&tree, "*").nodes() == expected(&tree, None).as_slice()
}

#[quickcheck]
fn prop_strict_results_are_a_subset(seeds: Vec<(u8, u8)>) -> bool {
    let tree = random_tree(&seeds);
    let chain = compile("div p");
    let inclusive = find_all(&tree, &chain);
    find_all_with(&tree, &chain, MatchOptions::strict())
        .iter()
        .all(|id| inclusive.contains(id) && tree.as_element(id).is_some_and(|el| el.tag_name == "p"))
}
