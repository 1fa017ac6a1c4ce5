// JSON interchange for trees: the parser front end hands trees over in this
// form and the command line tool reads them back.

use std::path::Path;

use serde::Deserialize;

use crate::ast::Node;
use crate::Result;

/// Parse a JSON document holding one tree or an array of trees.
///
/// Each node nests about three JSON levels, so serde_json's default depth
/// limit is lifted and the stack grows on demand instead.
pub fn parse_trees(json: &str) -> Result<Vec<Node>> {
    let mut deserializer = serde_json::Deserializer::from_str(json);
    deserializer.disable_recursion_limit();

    let trees = if json.trim_start().starts_with('[') {
        Vec::<Node>::deserialize(serde_stacker::Deserializer::new(&mut deserializer))?
    } else {
        vec![Node::deserialize(serde_stacker::Deserializer::new(&mut deserializer))?]
    };
    deserializer.end()?;

    Ok(trees)
}

pub fn load_trees(path: &Path) -> Result<Vec<Node>> {
    let json = std::fs::read_to_string(path)?;
    parse_trees(&json)
}

pub fn trees_to_json(trees: &[Node]) -> Result<String> {
    Ok(serde_json::to_string_pretty(trees)?)
}
