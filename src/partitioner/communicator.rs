//! The collective operations the partitioner needs from a parallel runtime.
use eyre::eyre;

/// A group of processes that take part in partitioning.
///
/// All processes must call [`Communicator::broadcast`] collectively.
pub trait Communicator {
    fn rank(&self) -> usize;

    fn size(&self) -> usize;

    /// Replaces `data` on every process by the contents of `data` on `root`.
    fn broadcast(&self, data: &mut Vec<usize>, root: usize) -> eyre::Result<()>;
}

/// The communicator of a program running on a single process.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerialCommunicator;

impl Communicator for SerialCommunicator {
    fn rank(&self) -> usize {
        0
    }

    fn size(&self) -> usize {
        1
    }

    fn broadcast(&self, _data: &mut Vec<usize>, root: usize) -> eyre::Result<()> {
        if root != 0 {
            return Err(eyre!("broadcast root {root} does not exist in a serial communicator"));
        }
        Ok(())
    }
}

#[cfg(feature = "mpi")]
pub use self::mpi_impl::MpiCommunicator;

#[cfg(feature = "mpi")]
mod mpi_impl {
    use super::Communicator;
    use eyre::eyre;
    use mpi::topology::SimpleCommunicator;
    use mpi::traits::{Communicator as _, Root};

    /// Communicator backed by an MPI communicator.
    pub struct MpiCommunicator {
        comm: SimpleCommunicator,
    }

    impl MpiCommunicator {
        pub fn new(comm: SimpleCommunicator) -> Self {
            Self { comm }
        }

        pub fn inner(&self) -> &SimpleCommunicator {
            &self.comm
        }
    }

    impl Communicator for MpiCommunicator {
        fn rank(&self) -> usize {
            self.comm.rank() as usize
        }

        fn size(&self) -> usize {
            self.comm.size() as usize
        }

        fn broadcast(&self, data: &mut Vec<usize>, root: usize) -> eyre::Result<()> {
            if root >= self.size() {
                return Err(eyre!("broadcast root {root} is not a rank of the communicator"));
            }
            let process = self.comm.process_at_rank(root as i32);

            let mut len = data.len() as u64;
            process.broadcast_into(&mut len);

            let mut buffer: Vec<u64> = if self.rank() == root {
                data.iter().map(|&x| x as u64).collect()
            } else {
                vec![0; len as usize]
            };
            process.broadcast_into(&mut buffer[..]);

            data.clear();
            data.extend(buffer.into_iter().map(|x| x as usize));
            Ok(())
        }
    }
}
