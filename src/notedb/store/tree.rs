use crate::model::{NodeState, Record, TreeNode};
use std::path::{Component, Path};
use uuid::Uuid;

/// Rebuilds the directory shape of `records` relative to `root`.
///
/// Scan order is arbitrary, so entries are inserted shortest path first and
/// then lexicographically; the same record set always yields the same tree.
pub fn build(root: &Path, records: &[Record]) -> Vec<TreeNode> {
    let mut entries: Vec<(String, Vec<String>, Option<Uuid>)> = records
        .iter()
        .map(|r| {
            let segments = segments(root, &r.path);
            (segments.join("/"), segments, r.id())
        })
        .collect();
    entries.sort_by(|(a, _, _), (b, _, _)| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));

    let mut top: Vec<TreeNode> = Vec::new();
    for (_, segments, id) in entries {
        let last = segments.len().saturating_sub(1);
        let mut level = &mut top;
        for (i, segment) in segments.iter().enumerate() {
            let pos = match level.iter().position(|n| &n.name == segment) {
                Some(pos) => pos,
                None => {
                    level.push(TreeNode::directory(segment.clone()));
                    level.len() - 1
                }
            };
            let node = &mut level[pos];
            if i == last {
                node.state = NodeState::File;
                node.id = id;
            }
            level = &mut node.contents;
        }
    }
    top
}

fn segments(root: &Path, path: &Path) -> Vec<String> {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn at(rel: &str) -> Record {
        Record::new(PathBuf::from("/root/notes").join(rel), String::new())
    }

    #[test]
    fn builds_nested_directories() {
        let records = vec![at("work/todo.txt"), at("a.txt"), at("work/deep/plan.md")];
        let tree = build(Path::new("/root/notes"), &records);

        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].name, "a.txt");
        assert_eq!(tree[0].state, NodeState::File);
        assert_eq!(tree[0].id, records[1].id());

        let work = &tree[1];
        assert_eq!(work.name, "work");
        assert_eq!(work.state, NodeState::Collapsed);
        assert!(work.id.is_none());
        let names: Vec<&str> = work.contents.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["todo.txt", "deep"]);
        assert_eq!(work.contents[1].contents[0].name, "plan.md");
    }

    #[test]
    fn order_independent_of_input_order() {
        let mut records = vec![at("b/x.txt"), at("a/y.txt"), at("c.txt"), at("a/b/z.txt")];
        let first = build(Path::new("/root/notes"), &records);
        records.reverse();
        let second = build(Path::new("/root/notes"), &records);
        assert_eq!(first, second);
    }

    #[test]
    fn headerless_files_have_no_id() {
        let legacy = Record::headerless(PathBuf::from("/root/notes/old.txt"), "x".into());
        let tree = build(Path::new("/root/notes"), &[legacy]);
        assert!(tree[0].is_file());
        assert!(tree[0].id.is_none());
    }

    #[test]
    fn serializes_like_the_listing_api() {
        let tree = build(Path::new("/root/notes"), &[at("inbox/n.txt")]);
        let json = serde_json::to_value(&tree).unwrap();
        assert_eq!(json[0]["name"], "inbox");
        assert_eq!(json[0]["state"], "collapsed");
        assert!(json[0].get("id").is_none());
        assert_eq!(json[0]["contents"][0]["state"], "file");
        assert!(json[0]["contents"][0]["id"].is_string());
    }
}
