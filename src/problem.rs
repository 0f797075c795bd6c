use crate::space::Space;
use crate::space::State;

/// A search problem over a Space.
///
/// Problems are only read during a search, so several searches can share
/// one.
pub trait Problem<Sp, St>: std::fmt::Debug
where
    Sp: Space<St>,
    St: State,
{
    fn space(&self) -> &Sp;
    fn start(&self) -> &St;
    fn is_goal(&self, s: &St) -> bool;

    #[inline(always)]
    fn neighbours(&self, s: &St) -> Vec<St> {
        self.space().neighbours(s)
    }
}
