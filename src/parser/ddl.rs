use super::common::{identifier, keyword, ws};
use super::statement::{ColumnDef, Command};
use nom::{
    IResult,
    character::complete::char,
    combinator::opt,
    multi::separated_list1,
    sequence::{delimited, pair, preceded},
};

pub fn create_database(input: &str) -> IResult<&str, Command> {
    let (input, name) = preceded(
        pair(keyword("CREATE"), keyword("DATABASE")),
        ws(identifier),
    )(input)?;
    Ok((input, Command::CreateDatabase { name }))
}

pub fn use_database(input: &str) -> IResult<&str, Command> {
    let (input, name) = preceded(keyword("USE"), ws(identifier))(input)?;
    Ok((input, Command::UseDatabase { name }))
}

pub fn create_table(input: &str) -> IResult<&str, Command> {
    let (input, name) = preceded(
        pair(keyword("CREATE"), keyword("TABLE")),
        ws(identifier),
    )(input)?;
    let (input, columns) = delimited(
        ws(char('(')),
        separated_list1(ws(char(',')), column_def),
        ws(char(')')),
    )(input)?;

    Ok((input, Command::CreateTable { name, columns }))
}

// `name [type]` - the declared type is a single token, accepted for syntax
// compatibility and dropped on write
fn column_def(input: &str) -> IResult<&str, ColumnDef> {
    let (input, (name, declared_type)) = pair(ws(identifier), opt(ws(identifier)))(input)?;
    Ok((input, ColumnDef { name, declared_type }))
}
