//! Text form of quaternions and containers
//!
//! A quaternion is written `{r,i,j,k}`, or as a bare real when it has no unreal part.
//! Containers nest square brackets, outermost axis first:
//! `[{1,0,0,0}, 2]` is a vector, `[[1,2],[3,4]]` a 2×2 matrix or rank-2 tensor.

use crate::error::{AlgebraError, Result};
use crate::quaternion::Quaternion;
use crate::scalar::RealField;
use core::fmt;

/// A parsed, not yet validated, bracket tree
#[derive(Debug)]
pub(crate) enum Nested<F> {
    Leaf(Quaternion<F>),
    List(Vec<Nested<F>>),
}

impl<F: RealField> Nested<F> {
    /// The extent of every axis, outermost first.
    /// Fails unless every list at the same depth has the same length.
    pub(crate) fn shape(&self) -> Result<Vec<usize>> {
        match self {
            Nested::Leaf(_) => Ok(vec![]),
            Nested::List(children) => {
                let mut shape = match children.first() {
                    Some(first) => first.shape()?,
                    None => vec![],
                };
                for child in children.iter().skip(1) {
                    let other = child.shape()?;
                    if other != shape {
                        return Err(AlgebraError::shape("parse", &shape, &other));
                    }
                }
                shape.insert(0, children.len());
                Ok(shape)
            }
        }
    }

    /// Elements in row-major order
    pub(crate) fn flatten(self, out: &mut Vec<Quaternion<F>>) {
        match self {
            Nested::Leaf(q) => out.push(q),
            Nested::List(children) => {
                for child in children {
                    child.flatten(out);
                }
            }
        }
    }
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn error(&self, reason: &str) -> AlgebraError {
        AlgebraError::Parse {
            position: self.pos,
            reason: reason.to_owned(),
        }
    }

    fn skip_ws(&mut self) {
        let rest = &self.src[self.pos..];
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn peek(&mut self) -> Option<char> {
        self.skip_ws();
        self.src[self.pos..].chars().next()
    }

    fn expect(&mut self, c: char) -> Result<()> {
        if self.peek() == Some(c) {
            self.pos += c.len_utf8();
            Ok(())
        } else {
            Err(self.error(&format!("expected '{}'", c)))
        }
    }

    fn real<F: RealField>(&mut self) -> Result<F> {
        self.skip_ws();
        let rest = &self.src[self.pos..];
        let len = rest
            .find(|c: char| c == ',' || c == ']' || c == '}' || c.is_whitespace())
            .unwrap_or(rest.len());
        if len == 0 {
            return Err(self.error("expected a number"));
        }
        let value = rest[..len]
            .parse::<F>()
            .map_err(|_| self.error("malformed number"))?;
        self.pos += len;
        Ok(value)
    }

    fn quaternion<F: RealField>(&mut self) -> Result<Quaternion<F>> {
        if self.peek() != Some('{') {
            return Ok(Quaternion::from_real(self.real()?));
        }
        self.expect('{')?;
        let r = self.real()?;
        self.expect(',')?;
        let i = self.real()?;
        self.expect(',')?;
        let j = self.real()?;
        self.expect(',')?;
        let k = self.real()?;
        self.expect('}')?;
        Ok(Quaternion::new(r, i, j, k))
    }

    fn nested<F: RealField>(&mut self) -> Result<Nested<F>> {
        if self.peek() != Some('[') {
            return Ok(Nested::Leaf(self.quaternion()?));
        }
        self.expect('[')?;
        let mut children = Vec::new();
        if self.peek() == Some(']') {
            self.pos += 1;
            return Ok(Nested::List(children));
        }
        loop {
            children.push(self.nested()?);
            match self.peek() {
                Some(',') => self.pos += 1,
                Some(']') => {
                    self.pos += 1;
                    return Ok(Nested::List(children));
                }
                _ => return Err(self.error("expected ',' or ']'")),
            }
        }
    }

    fn finish(&mut self) -> Result<()> {
        if self.peek().is_some() {
            Err(self.error("unexpected trailing input"))
        } else {
            Ok(())
        }
    }
}

pub(crate) fn parse_quaternion<F: RealField>(s: &str) -> Result<Quaternion<F>> {
    let mut parser = Parser { src: s, pos: 0 };
    let q = parser.quaternion()?;
    parser.finish()?;
    Ok(q)
}

pub(crate) fn parse_nested<F: RealField>(s: &str) -> Result<Nested<F>> {
    let mut parser = Parser { src: s, pos: 0 };
    let tree = parser.nested()?;
    parser.finish()?;
    Ok(tree)
}

/// Write row-major `elements` with the given shape as nested brackets
pub(crate) fn write_nested<F: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    shape: &[usize],
    elements: &[Quaternion<F>],
) -> fmt::Result {
    match shape.split_first() {
        None => match elements.first() {
            Some(q) => write!(f, "{}", q),
            None => Ok(()),
        },
        Some((&len, rest)) => {
            let stride: usize = rest.iter().product();
            write!(f, "[")?;
            for n in 0..len {
                if n > 0 {
                    write!(f, ",")?;
                }
                write_nested(f, rest, &elements[n * stride..(n + 1) * stride])?;
            }
            write!(f, "]")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quaternion_forms() {
        let q: Quaternion<f64> = parse_quaternion(" { 1, -2.5, 3e1, 0 } ").unwrap();
        assert_eq!(q, Quaternion::new(1., -2.5, 30., 0.));
        let q: Quaternion<f64> = parse_quaternion("7").unwrap();
        assert_eq!(q, Quaternion::from_real(7.));
        assert!(parse_quaternion::<f64>("{1,2,3}").is_err());
        assert!(parse_quaternion::<f64>("{1,2,3,4} x").is_err());
    }

    #[test]
    fn ragged_lists_are_rejected() {
        let tree = parse_nested::<f64>("[[1,2],[3]]").unwrap();
        assert!(tree.shape().is_err());
        let tree = parse_nested::<f64>("[[1,2],[3,{0,1,0,0}]]").unwrap();
        assert_eq!(tree.shape().unwrap(), vec![2, 2]);
    }
}
