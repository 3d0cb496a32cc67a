mod meditation_repo;

pub use meditation_repo::MeditationRepo;
