//! SQL syntax bundle

use crate::config::Properties;

const KEYWORDS: &str = "select,from,where,and,or,not,null,is,in,like,between,exists,\
insert,into,values,update,set,delete,create,alter,drop,table,view,index,\
join,inner,outer,left,right,full,on,as,group,by,order,having,distinct,\
union,all,case,when,then,else,end,asc,desc,limit,count,sum,min,max,avg,\
primary,key,foreign,references,default,commit,rollback,begin,dual";

/// Create the SQL bundle
pub fn sql_bundle() -> Properties {
    [
        ("colorcode.keywords", KEYWORDS),
        ("colorcode.keyword.foldcase", "upper"),
        ("colorcode.area.bgcolor", "#f7f7f0"),
        // Bind variables (:name) and T-SQL variables (@name)
        ("tokenizer.wordChar", ":,@"),
        ("colorcode.special.bind.pattern", "[:@][A-Za-z_][A-Za-z0-9_]*"),
        ("colorcode.special.bind.font.color", "#005580"),
    ]
    .into_iter()
    .collect()
}
