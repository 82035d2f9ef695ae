mod player;

pub use self::player::PlayerView;
