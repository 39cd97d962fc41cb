//! Support for displaying human-readable representations of a
//! [`RegionsRegister`].

use core::cell::Cell;
use core::fmt;

use crate::RegionsRegister;
use crate::area::{Area, AreaId};

/// Helper type to display a separated list of displayable values.
pub(crate) struct DisplayIter<T> {
    iter: Cell<Option<T>>,
    separator: &'static str,
}
impl<T: IntoIterator> fmt::Display for DisplayIter<T>
where
    T::Item: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(iter) = self.iter.take() else {
            return Ok(());
        };
        for (i, val) in iter.into_iter().enumerate() {
            if i == 0 {
                write!(f, "{val}")?;
            } else {
                write!(f, "{}{val}", self.separator)?;
            }
        }
        Ok(())
    }
}

pub(crate) fn display_iter<I: IntoIterator<Item = impl fmt::Display>>(
    iter: I,
    separator: &'static str,
) -> DisplayIter<I> {
    DisplayIter {
        iter: Cell::new(Some(iter)),
        separator,
    }
}

/// Displays a single register entry as `Area <id>: <label> <label> ...`.
pub struct DisplayArea<'a> {
    /// Identifier of the area.
    pub id: AreaId,

    /// Labels of the area.
    pub area: &'a Area,
}

impl fmt::Display for DisplayArea<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Area {}: {}",
            self.id.index(),
            display_iter(self.area.iter(), " ")
        )
    }
}

/// Wrapper around a [`RegionsRegister`] that provides a [`Display`]
/// implementation listing every live area on its own line, in area order.
///
/// [`Display`]: core::fmt::Display
pub struct DisplayRegister<'a>(pub &'a RegionsRegister);

impl fmt::Debug for DisplayRegister<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for DisplayRegister<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (area, id) in self.0.iter() {
            writeln!(f, "{}", DisplayArea { id, area })?;
        }
        Ok(())
    }
}
