use super::common::{identifier, keyword, ws};
use super::statement::Command;
use nom::{IResult, combinator::opt, sequence::preceded};

pub fn begin(input: &str) -> IResult<&str, Command> {
    let (input, _) = keyword("BEGIN")(input)?;
    let (input, _) = opt(keyword("TRANSACTION"))(input)?;
    let (input, acting_as) = acting_as(input)?;
    Ok((input, Command::Begin { acting_as }))
}

pub fn commit(input: &str) -> IResult<&str, Command> {
    let (input, acting_as) = preceded(keyword("COMMIT"), acting_as)(input)?;
    Ok((input, Command::Commit { acting_as }))
}

pub fn rollback(input: &str) -> IResult<&str, Command> {
    let (input, acting_as) = preceded(keyword("ROLLBACK"), acting_as)(input)?;
    Ok((input, Command::Rollback { acting_as }))
}

// `AS <user>` retargets which user's transaction state is touched
fn acting_as(input: &str) -> IResult<&str, Option<String>> {
    opt(preceded(keyword("AS"), ws(identifier)))(input)
}
