//! Whitespace-separated text descriptors.
//!
//! | File        | One line per | Columns                                 |
//! |-------------|--------------|-----------------------------------------|
//! | skeleton    | joint        | `x y z parent` (`parent = -1` for root) |
//! | mesh        | vertex/face  | `v x y z` or `f a b c` (1-based)        |
//! | attachments | vertex       | `joint_count - 1` weights (root omitted) |
//!
//! Blank lines are skipped everywhere. Line numbers in errors are 1-based.

use std::str::FromStr;

use glam::Vec3;

use crate::errors::{Result, SkinError};
use crate::mesh::{Attachments, Face};
use crate::skeleton::JointRecord;

use super::{MeshDescriptor, SkeletonDescriptor};

fn parse_token<T: FromStr>(token: Option<&str>, line: usize, what: &str) -> Result<T> {
    let token = token.ok_or_else(|| SkinError::parse(line, format!("missing {what}")))?;
    token
        .parse()
        .map_err(|_| SkinError::parse(line, format!("invalid {what} '{token}'")))
}

fn parse_vec3<'a>(tokens: &mut impl Iterator<Item = &'a str>, line: usize) -> Result<Vec3> {
    let x = parse_token(tokens.next(), line, "x coordinate")?;
    let y = parse_token(tokens.next(), line, "y coordinate")?;
    let z = parse_token(tokens.next(), line, "z coordinate")?;
    Ok(Vec3::new(x, y, z))
}

fn expect_end<'a>(tokens: &mut impl Iterator<Item = &'a str>, line: usize) -> Result<()> {
    match tokens.next() {
        Some(extra) => Err(SkinError::parse(line, format!("unexpected token '{extra}'"))),
        None => Ok(()),
    }
}

fn content_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty())
}

/// Parses a skeleton descriptor.
///
/// Only the syntax is checked; topology is validated by
/// [`Skeleton::build`](crate::skeleton::Skeleton::build).
pub fn parse_skeleton(text: &str) -> Result<SkeletonDescriptor> {
    let mut joints = Vec::new();

    for (line, content) in content_lines(text) {
        let mut tokens = content.split_whitespace();
        let offset = parse_vec3(&mut tokens, line)?;
        let parent: i64 = parse_token(tokens.next(), line, "parent index")?;
        expect_end(&mut tokens, line)?;

        let parent = match parent {
            -1 => None,
            p if p >= 0 => Some(p as usize),
            p => return Err(SkinError::parse(line, format!("invalid parent index {p}"))),
        };
        joints.push(JointRecord { offset, parent });
    }

    Ok(SkeletonDescriptor { joints })
}

fn parse_face_index(token: Option<&str>, line: usize) -> Result<u32> {
    // `f 1/1/1 ...` style: only the position index matters
    let position = token.map(|t| t.split('/').next().unwrap_or(t));
    let index: u32 = parse_token(position, line, "face index")?;
    index
        .checked_sub(1)
        .ok_or_else(|| SkinError::parse(line, "face indices are 1-based"))
}

/// Parses a mesh descriptor. Face indices are converted to 0-based and every
/// face must have exactly three of them.
///
/// Lines with any tag other than `v` or `f` are ignored.
pub fn parse_mesh(text: &str) -> Result<MeshDescriptor> {
    let mut vertices = Vec::new();
    let mut faces: Vec<Face> = Vec::new();

    for (line, content) in content_lines(text) {
        let mut tokens = content.split_whitespace();
        match tokens.next() {
            Some("v") => vertices.push(parse_vec3(&mut tokens, line)?),
            Some("f") => {
                let a = parse_face_index(tokens.next(), line)?;
                let b = parse_face_index(tokens.next(), line)?;
                let c = parse_face_index(tokens.next(), line)?;
                // triangles only
                expect_end(&mut tokens, line)?;
                faces.push([a, b, c]);
            }
            _ => {}
        }
    }

    Ok(MeshDescriptor { vertices, faces })
}

/// Parses per-vertex weights for a skeleton of `joint_count` joints.
///
/// Each line carries the weights of joints `1..joint_count`. The root weight
/// is inserted as 0.
pub fn parse_attachments(text: &str, joint_count: usize) -> Result<Attachments> {
    if joint_count == 0 {
        return Err(SkinError::EmptySkeleton);
    }

    let mut attachments = Attachments::with_joint_count(joint_count);
    let mut row = vec![0.0_f32; joint_count];

    for (line, content) in content_lines(text) {
        let mut count = 0;
        for token in content.split_whitespace() {
            count += 1;
            if count >= joint_count {
                continue;
            }
            row[count] = parse_token(Some(token), line, "weight")?;
        }
        if count != joint_count - 1 {
            return Err(SkinError::parse(
                line,
                format!("expected {} weights, found {count}", joint_count - 1),
            ));
        }

        row[0] = 0.0;
        attachments.push_vertex(&row)?;
    }

    Ok(attachments)
}
