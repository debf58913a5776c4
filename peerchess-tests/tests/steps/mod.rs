mod game_steps;
mod media_steps;
mod room_steps;
