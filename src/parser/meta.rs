use super::common::{identifier, keyword, ws};
use super::statement::Command;
use nom::{IResult, sequence::preceded};

pub fn show_databases(input: &str) -> IResult<&str, Command> {
    let (input, _) = preceded(keyword("SHOW"), keyword("DATABASES"))(input)?;
    Ok((input, Command::ShowDatabases))
}

pub fn show_tables(input: &str) -> IResult<&str, Command> {
    let (input, _) = preceded(keyword("SHOW"), keyword("TABLES"))(input)?;
    Ok((input, Command::ShowTables))
}

pub fn describe(input: &str) -> IResult<&str, Command> {
    let (input, table) = preceded(keyword("DESCRIBE"), ws(identifier))(input)?;
    Ok((input, Command::Describe { table }))
}
