use crate::state::{Score, DEFAULT_DEPTH_LIMIT};
use crate::tree::TreeNode;
use std::fmt;
use thiserror::Error;

/// Parenthesised notation for explicit game trees.
///
/// ```text
/// tree  := leaf | "(" label child+ ")"
/// leaf  := [label ":"] integer
/// label := name ["=" integer]      (internal nodes only)
/// ```
///
/// For example `(A (B D:3 E:5) C:7)` or, with unnamed leaves, `(A (B 3 5) 7)`.
/// Nodes may be nested at most [`MAX_NESTING`] levels deep.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("unexpected end of input")]
    UnexpectedEnd,
    #[error("unexpected token '{token}' at offset {offset}")]
    UnexpectedToken { token: String, offset: usize },
    #[error("invalid number '{0}'")]
    InvalidNumber(String),
    #[error("invalid label '{0}'")]
    InvalidLabel(String),
    #[error("node '{0}' has no children")]
    EmptyNode(String),
    #[error("trailing input after tree: '{0}'")]
    TrailingInput(String),
    #[error("tree nested deeper than {limit} levels at offset {offset}")]
    TooDeep { limit: u32, offset: usize },
}

/// Deepest nesting of parenthesised nodes the parser accepts.
pub const MAX_NESTING: u32 = DEFAULT_DEPTH_LIMIT;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token<'a> {
    Open,
    Close,
    Atom(&'a str),
}

fn tokenize(input: &str) -> Vec<(usize, Token<'_>)> {
    let mut tokens = Vec::new();
    let mut start = None;

    for (i, c) in input.char_indices() {
        if c == '(' || c == ')' || c.is_whitespace() {
            if let Some(s) = start.take() {
                tokens.push((s, Token::Atom(&input[s..i])));
            }
            if c == '(' {
                tokens.push((i, Token::Open));
            } else if c == ')' {
                tokens.push((i, Token::Close));
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(s) = start {
        tokens.push((s, Token::Atom(&input[s..])));
    }

    tokens
}

fn parse_number(s: &str) -> Result<Score, TreeError> {
    s.parse::<Score>()
        .map_err(|_| TreeError::InvalidNumber(s.to_string()))
}

fn check_label(label: &str) -> Result<&str, TreeError> {
    if label.is_empty() || label.contains([':', '=']) {
        return Err(TreeError::InvalidLabel(label.to_string()));
    }
    Ok(label)
}

fn parse_leaf(atom: &str) -> Result<TreeNode, TreeError> {
    match atom.split_once(':') {
        Some((label, score)) => Ok(TreeNode::leaf(check_label(label)?, parse_number(score)?)),
        None => Ok(TreeNode::leaf("", parse_number(atom)?)),
    }
}

fn parse_header(atom: &str) -> Result<TreeNode, TreeError> {
    match atom.split_once('=') {
        Some((label, estimate)) => Ok(TreeNode::internal(check_label(label)?, Vec::new())
            .with_estimate(parse_number(estimate)?)),
        None => Ok(TreeNode::internal(check_label(atom)?, Vec::new())),
    }
}

struct Parser<'a> {
    tokens: Vec<(usize, Token<'a>)>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn next(&mut self) -> Option<(usize, Token<'a>)> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn peek(&self) -> Option<&Token<'a>> {
        self.tokens.get(self.pos).map(|(_, t)| t)
    }

    fn parse_tree(&mut self, nesting: u32) -> Result<TreeNode, TreeError> {
        match self.next() {
            None => Err(TreeError::UnexpectedEnd),
            Some((_, Token::Atom(atom))) => parse_leaf(atom),
            Some((offset, Token::Close)) => Err(TreeError::UnexpectedToken {
                token: String::from(")"),
                offset,
            }),
            Some((offset, Token::Open)) => {
                if nesting >= MAX_NESTING {
                    return Err(TreeError::TooDeep {
                        limit: MAX_NESTING,
                        offset,
                    });
                }
                let mut node = match self.next() {
                    None => return Err(TreeError::UnexpectedEnd),
                    Some((_, Token::Atom(atom))) => parse_header(atom)?,
                    Some((offset, token)) => {
                        return Err(TreeError::UnexpectedToken {
                            token: token_text(&token).to_string(),
                            offset,
                        })
                    }
                };
                loop {
                    match self.peek() {
                        None => return Err(TreeError::UnexpectedEnd),
                        Some(Token::Close) => {
                            self.pos += 1;
                            break;
                        }
                        Some(_) => node.children.push(self.parse_tree(nesting + 1)?),
                    }
                }
                if node.children.is_empty() {
                    return Err(TreeError::EmptyNode(node.label));
                }
                Ok(node)
            }
        }
    }
}

fn token_text<'a>(token: &Token<'a>) -> &'a str {
    match token {
        Token::Open => "(",
        Token::Close => ")",
        Token::Atom(s) => s,
    }
}

impl TreeNode {
    /// Parses a tree from its parenthesised notation.
    pub fn parse(input: &str) -> Result<Self, TreeError> {
        let mut parser = Parser {
            tokens: tokenize(input),
            pos: 0,
        };
        let tree = parser.parse_tree(0)?;
        if let Some((offset, _)) = parser.tokens.get(parser.pos) {
            return Err(TreeError::TrailingInput(input[*offset..].trim().to_string()));
        }
        Ok(tree)
    }
}

impl std::str::FromStr for TreeNode {
    type Err = TreeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TreeNode::parse(s)
    }
}

impl fmt::Display for TreeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_leaf() {
            let score = self.value.unwrap_or(0);
            if self.label.is_empty() {
                return write!(f, "{score}");
            }
            return write!(f, "{}:{score}", self.label);
        }

        write!(f, "({}", self.label)?;
        if let Some(estimate) = self.value {
            write!(f, "={estimate}")?;
        }
        for child in &self.children {
            write!(f, " {child}")?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_named_tree() {
        let tree = TreeNode::parse("(A (B D:3 E:5) C:7)").unwrap();
        assert_eq!(tree.label, "A");
        assert_eq!(tree.children.len(), 2);
        assert_eq!(tree.children[0].children[1], TreeNode::leaf("E", 5));
        assert_eq!(tree.children[1], TreeNode::leaf("C", 7));
    }

    #[test]
    fn test_parse_unnamed_leaves_and_estimates() {
        let tree: TreeNode = "(root=2 (x=-4 1 -2) 9)".parse().unwrap();
        assert_eq!(tree.value, Some(2));
        assert_eq!(tree.children[0].value, Some(-4));
        assert_eq!(tree.children[0].children[1], TreeNode::leaf("", -2));
        assert_eq!(tree.children[1].name(), "9");
    }

    #[test]
    fn test_single_leaf() {
        assert_eq!(TreeNode::parse("  win:1000 ").unwrap(), TreeNode::leaf("win", 1000));
        assert_eq!(TreeNode::parse("-3").unwrap(), TreeNode::leaf("", -3));
    }

    #[test]
    fn test_display_round_trip() {
        let text = "(A=1 (B D:3 5) C:7)";
        let tree = TreeNode::parse(text).unwrap();
        assert_eq!(tree.to_string(), text);
        assert_eq!(TreeNode::parse(&tree.to_string()).unwrap(), tree);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(TreeNode::parse(""), Err(TreeError::UnexpectedEnd));
        assert_eq!(TreeNode::parse("(A (B 1 2)"), Err(TreeError::UnexpectedEnd));
        assert_eq!(TreeNode::parse("(A)"), Err(TreeError::EmptyNode("A".into())));
        assert_eq!(
            TreeNode::parse("(A x:y)"),
            Err(TreeError::InvalidNumber("y".into()))
        );
        assert_eq!(
            TreeNode::parse("(A 1) 2"),
            Err(TreeError::TrailingInput("2".into()))
        );
        assert_eq!(
            TreeNode::parse(")"),
            Err(TreeError::UnexpectedToken {
                token: ")".into(),
                offset: 0
            })
        );
        assert_eq!(
            TreeNode::parse("(:1 2)"),
            Err(TreeError::InvalidLabel(":1".into()))
        );
    }

    fn nested(levels: usize) -> String {
        format!("{}1{}", "(a ".repeat(levels), ")".repeat(levels))
    }

    #[test]
    fn test_nesting_limit() {
        let levels = MAX_NESTING as usize;
        let tree = TreeNode::parse(&nested(levels)).unwrap();
        assert_eq!(tree.height(), MAX_NESTING);

        assert_eq!(
            TreeNode::parse(&nested(levels + 1)),
            Err(TreeError::TooDeep {
                limit: MAX_NESTING,
                offset: 3 * levels
            })
        );
    }

    #[test]
    fn test_very_deep_input_is_rejected() {
        let result = TreeNode::parse(&nested(200_000));
        assert!(matches!(result, Err(TreeError::TooDeep { .. })));
    }
}
