//! Java syntax bundle

use crate::config::Properties;

const KEYWORDS: &str = "abstract,assert,boolean,break,byte,case,catch,char,class,const,\
continue,default,do,double,else,enum,extends,final,finally,float,for,goto,if,\
implements,import,instanceof,int,interface,long,native,new,package,private,\
protected,public,return,short,static,strictfp,super,switch,synchronized,this,\
throw,throws,transient,try,void,volatile,while,true,false,null";

/// Create the Java bundle
pub fn java_bundle() -> Properties {
    [
        ("colorcode.keywords", KEYWORDS),
        ("colorcode.keyword.ignorecase", "false"),
        ("tokenizer.wordChar", "@"),
        ("tokenizer.slashSlashComments", "true"),
        ("tokenizer.slashStarComments", "true"),
        ("colorcode.special.annotation.pattern", "@[A-Za-z_][A-Za-z0-9_]*"),
        ("colorcode.special.annotation.font.color", "#646464"),
    ]
    .into_iter()
    .collect()
}
