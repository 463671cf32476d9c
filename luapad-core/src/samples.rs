//! Lua programs shipped with the playground.

/// Loaded into the editor on startup: a number guessing game using all three host capabilities.
pub const GUESSING_GAME: &str = r#"-- Number guessing game
math.randomseed(os_time())
print("Guess a number between 1 and 100!")

local secret_number = math.random(1, 100)
local attempts = 0

while true do
  attempts = attempts + 1
  print("Attempt " .. attempts .. ": ")

  local input = io_read()
  local guess = tonumber(input)

  if guess == nil then
    print("Please enter a number.")
  elseif guess < secret_number then
    print("Higher.")
  elseif guess > secret_number then
    print("Lower.")
  else
    print("Correct! You got it in " .. attempts .. " attempts.")
    break
  end
end"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlaygroundConfig;
    use crate::runtime::CancelHandle;
    use crate::session::{Session, Step};

    #[test]
    fn test_guessing_game_compiles_and_asks_for_input() {
        let mut s = Session::compile(&PlaygroundConfig::default(), GUESSING_GAME, CancelHandle::new()).unwrap();
        assert_eq!(s.resume(None), Step::AwaitingInput);
        assert_eq!(s.take_output(), "Guess a number between 1 and 100!\nAttempt 1: \n");
    }

    #[test]
    fn test_guessing_game_rejects_non_numbers() {
        let mut s = Session::compile(&PlaygroundConfig::default(), GUESSING_GAME, CancelHandle::new()).unwrap();
        s.resume(None);
        s.take_output();
        assert_eq!(s.resume(Some("abc")), Step::AwaitingInput);
        assert_eq!(s.take_output(), "Please enter a number.\nAttempt 2: \n");
    }

    #[test]
    fn test_guessing_game_binary_search_wins() {
        let mut s = Session::compile(&PlaygroundConfig::default(), GUESSING_GAME, CancelHandle::new()).unwrap();
        assert_eq!(s.resume(None), Step::AwaitingInput);
        let (mut lo, mut hi) = (1, 100);
        for _ in 0..10 {
            s.take_output();
            let guess = (lo + hi) / 2;
            match s.resume(Some(&guess.to_string())) {
                Step::Completed => {
                    assert!(s.take_output().starts_with("Correct!"));
                    return;
                }
                Step::AwaitingInput => {
                    let out = s.take_output();
                    if out.starts_with("Higher.") {
                        lo = guess + 1;
                    } else {
                        assert!(out.starts_with("Lower."), "unexpected output {:?}", out);
                        hi = guess - 1;
                    }
                }
                Step::Errored(err) => panic!("game failed: {}", err),
            }
        }
        panic!("binary search should finish within 7 guesses");
    }
}
