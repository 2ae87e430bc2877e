/// Parser for the ASCII stage description format
///
/// ```text
/// stage mpu 0.01 upaxis Z
/// prim /World/Crate
///     translate 0 0 0
///     rotate 0 0 0
///     scale 1 1 1
///     extent -1 -1 -1 1 1 1
///     reference file://assets/crate.usd
/// endprim
/// ```
///
/// All prim fields are optional; missing ancestors are created implicitly.
use nom::{
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{multispace0, multispace1},
    combinator::map,
    multi::many0,
    number::complete::double,
    sequence::preceded,
    IResult,
};

use nalgebra::{Point3, Vector3};

use crate::bounds::Aabb;
use crate::error::Error;
use crate::scene::{Axis, Prim, PrimPath, Stage};

/// Parse a complete stage document.
pub fn parse_stage(input: &str) -> Result<Stage, Error> {
    let (rest, (mpu, up_axis, prims)) =
        parse_stage_impl(input).map_err(|e| Error::Parse(format!("{e:?}")))?;
    if !rest.trim().is_empty() {
        return Err(Error::Parse(format!(
            "unexpected content after last prim: {:?}",
            rest.trim().lines().next().unwrap_or("")
        )));
    }

    let mut stage = Stage::with_metadata(mpu, up_axis)?;
    for (raw_path, prim) in prims {
        let path = PrimPath::new(&raw_path)?;
        *stage.define_prim(&path) = prim;
    }
    Ok(stage)
}

fn parse_stage_impl(input: &str) -> IResult<&str, (f64, Axis, Vec<(String, Prim)>)> {
    let (input, _) = preceded(multispace0, tag("stage"))(input)?;
    let (input, _) = preceded(multispace1, tag("mpu"))(input)?;
    let (input, mpu) = preceded(multispace1, double)(input)?;
    let (input, _) = preceded(multispace1, tag("upaxis"))(input)?;
    let (input, up_axis) = preceded(multispace1, parse_axis)(input)?;
    let (input, prims) = many0(parse_prim_block)(input)?;
    Ok((input, (mpu, up_axis, prims)))
}

fn parse_axis(input: &str) -> IResult<&str, Axis> {
    alt((
        map(tag("X"), |_| Axis::X),
        map(tag("Y"), |_| Axis::Y),
        map(tag("Z"), |_| Axis::Z),
    ))(input)
}

/// One whitespace-delimited token (paths, URLs).
fn parse_token(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| !c.is_whitespace())(input)
}

enum PrimField {
    Translate(Vector3<f64>),
    Rotate(Vector3<f64>),
    Scale(Vector3<f64>),
    Extent(Aabb),
    Reference(String),
}

fn parse_prim_block(input: &str) -> IResult<&str, (String, Prim)> {
    let (input, _) = preceded(multispace0, tag("prim"))(input)?;
    let (input, path) = preceded(multispace1, parse_token)(input)?;
    let (input, fields) = many0(parse_field)(input)?;
    let (input, _) = preceded(multispace0, tag("endprim"))(input)?;

    let mut prim = Prim::new();
    for field in fields {
        match field {
            PrimField::Translate(v) => prim.translate = v,
            PrimField::Rotate(v) => prim.rotate = v,
            PrimField::Scale(v) => prim.scale = v,
            PrimField::Extent(aabb) => prim.extent = Some(aabb),
            PrimField::Reference(url) => prim.reference = Some(url),
        }
    }
    Ok((input, (path.to_string(), prim)))
}

fn parse_field(input: &str) -> IResult<&str, PrimField> {
    preceded(
        multispace0,
        alt((
            map(preceded(tag("translate"), parse_triple), PrimField::Translate),
            map(preceded(tag("rotate"), parse_triple), PrimField::Rotate),
            map(preceded(tag("scale"), parse_triple), PrimField::Scale),
            map(preceded(tag("extent"), parse_extent), PrimField::Extent),
            map(
                preceded(tag("reference"), preceded(multispace1, parse_token)),
                |url| PrimField::Reference(url.to_string()),
            ),
        )),
    )(input)
}

fn parse_triple(input: &str) -> IResult<&str, Vector3<f64>> {
    let (input, _) = multispace1(input)?;
    let (input, x) = double(input)?;
    let (input, _) = multispace1(input)?;
    let (input, y) = double(input)?;
    let (input, _) = multispace1(input)?;
    let (input, z) = double(input)?;
    Ok((input, Vector3::new(x, y, z)))
}

fn parse_extent(input: &str) -> IResult<&str, Aabb> {
    let (input, min) = parse_triple(input)?;
    let (input, max) = parse_triple(input)?;
    Ok((
        input,
        Aabb::new(Point3::from(min), Point3::from(max)),
    ))
}
