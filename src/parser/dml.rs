use super::common::{identifier, keyword, literal, non_keyword_identifier, ws};
use super::statement::Command;
use crate::core::RowFilter;
use nom::{
    IResult,
    branch::alt,
    character::complete::char,
    combinator::{map, opt},
    multi::separated_list1,
    sequence::{delimited, pair, preceded, separated_pair, tuple},
};

pub fn insert(input: &str) -> IResult<&str, Command> {
    let (input, table) = preceded(
        pair(keyword("INSERT"), keyword("INTO")),
        ws(identifier),
    )(input)?;
    let (input, values) = preceded(
        keyword("VALUES"),
        delimited(
            ws(char('(')),
            separated_list1(ws(char(',')), ws(literal)),
            ws(char(')')),
        ),
    )(input)?;

    Ok((input, Command::Insert { table, values }))
}

pub fn select(input: &str) -> IResult<&str, Command> {
    let (input, _) = keyword("SELECT")(input)?;
    let (input, _) = ws(char('*'))(input)?;
    let (input, table) = preceded(keyword("FROM"), ws(identifier))(input)?;
    let (input, filter) = opt(preceded(keyword("WHERE"), equality))(input)?;

    Ok((input, Command::Select { table, filter }))
}

pub fn update(input: &str) -> IResult<&str, Command> {
    let (input, table) = preceded(keyword("UPDATE"), ws(identifier))(input)?;
    let (input, (set_column, set_value)) = preceded(keyword("SET"), equality)(input)?;
    let (input, (where_column, where_value)) = preceded(keyword("WHERE"), equality)(input)?;

    Ok((
        input,
        Command::Update {
            table,
            set_column,
            set_value,
            where_column,
            where_value,
        },
    ))
}

pub fn delete(input: &str) -> IResult<&str, Command> {
    let (input, table) = preceded(
        pair(keyword("DELETE"), keyword("FROM")),
        ws(identifier),
    )(input)?;
    let (input, (where_column, filter)) = preceded(
        keyword("WHERE"),
        tuple((
            ws(non_keyword_identifier),
            alt((
                map(preceded(ws(char('=')), ws(literal)), RowFilter::Equals),
                map(preceded(keyword("LIKE"), ws(literal)), RowFilter::Like),
            )),
        )),
    )(input)?;

    Ok((
        input,
        Command::Delete {
            table,
            where_column,
            filter,
        },
    ))
}

// `column = literal`, shared by the SELECT/UPDATE clauses
fn equality(input: &str) -> IResult<&str, (String, String)> {
    separated_pair(ws(non_keyword_identifier), ws(char('=')), ws(literal))(input)
}
