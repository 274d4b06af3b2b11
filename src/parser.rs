use crate::error::{MindmapError, Result};
use crate::ir::{NodeId, NodePath, Tree};
use log::{debug, trace};

/// Parses an indented outline into a tree.
///
/// Every open level keeps its indent, its sibling counter and the node last
/// created on it. A line closes the levels indented deeper than itself. If
/// an open level has exactly its indent, the line is that level's next
/// sibling. If nothing was closed, the line opens one new level beneath the
/// innermost open one, however far it is indented. A line that closes levels
/// but lands between two open indents has no parent and is rejected.
pub fn parse_outline(input: &str) -> Result<Tree> {
    let mut tree = Tree::new();
    let mut stack: Vec<Level> = Vec::new();

    for (idx, raw_line) in input.lines().enumerate() {
        let text = raw_line.trim();
        if text.is_empty() {
            continue;
        }
        let line = idx + 1;
        let indent = count_indent(raw_line);

        let mut closed = false;
        while stack.last().is_some_and(|level| level.indent > indent) {
            stack.pop();
            closed = true;
        }
        match stack.last_mut() {
            Some(level) if level.indent == indent => level.index += 1,
            Some(_) if closed => return Err(MindmapError::MissingParent { line, indent }),
            None if !tree.is_empty() => {
                return Err(MindmapError::SecondRoot {
                    line,
                    text: text.to_string(),
                });
            }
            _ => stack.push(Level {
                indent,
                index: 0,
                node: 0,
            }),
        }

        if stack.len() == 1 && !tree.is_empty() {
            return Err(MindmapError::SecondRoot {
                line,
                text: text.to_string(),
            });
        }

        let path = NodePath::from_segments(stack.iter().map(|level| level.index).collect());
        let parent = stack.len().checked_sub(2).map(|depth| stack[depth].node);
        trace!("line {line}: {path} {text:?}");
        let id = tree.insert(text.to_string(), path, parent);
        if let Some(level) = stack.last_mut() {
            level.node = id;
        }
    }

    if tree.is_empty() {
        return Err(MindmapError::EmptyOutline);
    }
    debug!("parsed {} outline nodes", tree.len());
    Ok(tree)
}

struct Level {
    indent: usize,
    index: usize,
    node: NodeId,
}

fn count_indent(line: &str) -> usize {
    line.chars().take_while(|ch| ch.is_whitespace()).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(tree: &Tree) -> Vec<String> {
        tree.nodes.iter().map(|node| node.path.to_string()).collect()
    }

    #[test]
    fn parses_simple_outline() {
        let tree = parse_outline("top\n child A\n child B\n  grandchild").unwrap();
        assert_eq!(paths(&tree), ["0", "0-0", "0-1", "0-1-0"]);
        assert_eq!(tree.nodes[3].text, "grandchild");
        assert_eq!(tree.nodes[3].parent, Some(2));
        assert_eq!(tree.nodes[0].children, vec![1, 2]);
    }

    #[test]
    fn deeper_jump_opens_a_single_level() {
        let tree = parse_outline("root\n      far\n      near").unwrap();
        assert_eq!(paths(&tree), ["0", "0-0", "0-1"]);
    }

    #[test]
    fn first_line_indent_sets_root_level() {
        let input = "\n  top\n   a\n    b\n   c\n";
        let tree = parse_outline(input).unwrap();
        assert_eq!(paths(&tree), ["0", "0-0", "0-0-0", "0-1"]);
        assert_eq!(tree.nodes[0].text, "top");
    }

    #[test]
    fn four_space_siblings_stay_siblings() {
        let tree = parse_outline("root\n    a\n        a1\n    b").unwrap();
        assert_eq!(paths(&tree), ["0", "0-0", "0-0-0", "0-1"]);
    }

    #[test]
    fn dedent_between_open_levels_is_rejected() {
        let err = parse_outline("root\n    a\n  b").unwrap_err();
        assert!(matches!(err, MindmapError::MissingParent { line: 3, indent: 2 }));
        assert!(err.is_client_error());

        let err = parse_outline("root\n    a\n    a2\n  b\n  c").unwrap_err();
        assert!(matches!(err, MindmapError::MissingParent { line: 4, .. }));
    }

    #[test]
    fn mixed_indents_never_reuse_a_path() {
        let input = "root\n  a\n      a1\n      a2\n         a2x\n      a3\n  b\n   b1\n  c";
        let tree = parse_outline(input).unwrap();
        assert_eq!(
            paths(&tree),
            ["0", "0-0", "0-0-0", "0-0-1", "0-0-1-0", "0-0-2", "0-1", "0-1-0", "0-2"]
        );
        let unique: std::collections::HashSet<&NodePath> =
            tree.nodes.iter().map(|node| &node.path).collect();
        assert_eq!(unique.len(), tree.len());
        for node in &tree.nodes {
            assert_eq!(tree.lookup(&node.path), Some(node.id));
            if let Some(parent) = node.parent {
                assert_eq!(Some(tree.nodes[parent].path.clone()), node.path.parent());
            }
        }
    }

    #[test]
    fn tabs_count_as_indent() {
        let tree = parse_outline("root\n\tchild\n\t\tleaf").unwrap();
        assert_eq!(paths(&tree), ["0", "0-0", "0-0-0"]);
    }

    #[test]
    fn skips_blank_lines() {
        let tree = parse_outline("root\n\n  a\n   \n  b").unwrap();
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn rejects_second_root() {
        let err = parse_outline("root\n child\nother").unwrap_err();
        assert!(matches!(err, MindmapError::SecondRoot { line: 3, .. }));
    }

    #[test]
    fn rejects_line_shallower_than_root() {
        let err = parse_outline("  root\n    child\nother").unwrap_err();
        assert!(matches!(err, MindmapError::SecondRoot { line: 3, .. }));
    }

    #[test]
    fn rejects_empty_outline() {
        assert!(matches!(
            parse_outline("  \n\n").unwrap_err(),
            MindmapError::EmptyOutline
        ));
    }

    #[test]
    fn keeps_japanese_labels() {
        let input = " top\n  基本概念の理解\n   Javaの歴史と特徴\n  開発環境の設定";
        let tree = parse_outline(input).unwrap();
        assert_eq!(paths(&tree), ["0", "0-0", "0-0-0", "0-1"]);
        assert_eq!(tree.nodes[3].text, "開発環境の設定");
    }

    #[test]
    fn outline_round_trip() {
        let input = "root\n  a\n    a1\n    a2\n      deep\n  b\n  c\n    c1";
        let tree = parse_outline(input).unwrap();
        let reparsed = parse_outline(&tree.to_outline()).unwrap();
        let original: Vec<(String, String)> = tree
            .nodes
            .iter()
            .map(|n| (n.path.to_string(), n.text.clone()))
            .collect();
        let round: Vec<(String, String)> = reparsed
            .nodes
            .iter()
            .map(|n| (n.path.to_string(), n.text.clone()))
            .collect();
        assert_eq!(original, round);
    }
}
