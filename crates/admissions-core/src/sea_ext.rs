use sea_orm::{
    ColumnTrait, Condition, EntityTrait, QueryFilter, Select,
    sea_query::{Expr, Func, LikeExpr},
};

const LIKE_ESCAPE: char = '\\';

/// Case-insensitive substring filter across several columns.
pub trait SearchAny {
    /// Keep rows where any of `columns` contains `term`, ignoring case.
    /// A blank term leaves the query untouched.
    fn search_any<C>(self, columns: &[C], term: &str) -> Self
    where
        C: ColumnTrait;
}

impl<E> SearchAny for Select<E>
where
    E: EntityTrait,
{
    fn search_any<C>(self, columns: &[C], term: &str) -> Self
    where
        C: ColumnTrait,
    {
        let term = term.trim();
        if term.is_empty() || columns.is_empty() {
            return self;
        }
        let pattern = contains_pattern(term);
        let condition = columns.iter().fold(Condition::any(), |cond, col| {
            cond.add(
                Expr::expr(Func::lower(Expr::col(*col)))
                    .like(LikeExpr::new(pattern.clone()).escape(LIKE_ESCAPE)),
            )
        });
        self.filter(condition)
    }
}

/// Build a lowercase `%term%` pattern with LIKE wildcards escaped.
pub fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.to_lowercase().chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
