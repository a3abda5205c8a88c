use miette::SourceSpan;

/// Position relative to start of source.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Debug)]
pub struct Idx(pub u32);

/// Holds a view into a program source.
#[derive(Clone, Copy, PartialEq, Eq, Default, Hash, Debug)]
pub struct Span {
    start: Idx,
    len: u32,
}

impl Span {
    pub fn new(start: Idx, len: u32) -> Self {
        Span { start, len }
    }

    /// Span covering `text`, which must be a subslice of `src`.
    pub fn within(src: &str, text: &str) -> Self {
        let start = text.as_ptr() as usize - src.as_ptr() as usize;
        debug_assert!(start + text.len() <= src.len(), "text is not part of source");
        Span::new(Idx(start as u32), text.len() as u32)
    }

    pub fn as_range(&self) -> std::ops::Range<usize> {
        let start = self.start.0 as usize;
        let end = start + self.len as usize;
        start..end
    }
}

impl From<Span> for SourceSpan {
    fn from(value: Span) -> Self {
        let range = value.as_range();
        SourceSpan::new(range.start.into(), range.len())
    }
}
