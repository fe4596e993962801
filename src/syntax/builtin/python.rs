//! Python syntax bundle

use crate::config::Properties;

const KEYWORDS: &str = "False,None,True,and,as,assert,async,await,break,class,continue,\
def,del,elif,else,except,finally,for,from,global,if,import,in,is,lambda,\
nonlocal,not,or,pass,raise,return,try,while,with,yield,self";

/// Create the Python bundle
pub fn python_bundle() -> Properties {
    [
        ("colorcode.keywords", KEYWORDS),
        ("colorcode.keyword.ignorecase", "false"),
        ("colorcode.tabsize", "4"),
        ("tokenizer.wordChar", "#,@"),
        // A leading `#word` is a comment or shebang marker
        ("colorcode.special.comment.pattern", "^#.*"),
        ("colorcode.special.comment.font.color", "#3f7f5f"),
        ("colorcode.special.comment.font.italic", "true"),
        ("colorcode.special.decorator.pattern", "@[A-Za-z_][A-Za-z0-9_.]*"),
        ("colorcode.special.decorator.font.color", "#aa22ff"),
    ]
    .into_iter()
    .collect()
}
