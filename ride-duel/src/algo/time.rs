use crate::algo::PointInTime;

pub trait SortChronologically {
    /// stable, points sharing a timestamp keep their relative order
    fn sort_chronologically(&mut self);
}

impl<PIT> SortChronologically for [PIT]
where
    PIT: PointInTime,
{
    fn sort_chronologically(&mut self) {
        self.sort_by_key(|pit| pit.timestamp())
    }
}

pub trait DedupTimestamps {
    /// drop every point sharing its timestamp with the point before it
    fn dedup_timestamps(&mut self) -> usize;
}

impl<PIT> DedupTimestamps for Vec<PIT>
where
    PIT: PointInTime,
{
    fn dedup_timestamps(&mut self) -> usize {
        let len_before = self.len();
        self.dedup_by(|later, earlier| later.timestamp() == earlier.timestamp());
        len_before - self.len()
    }
}
