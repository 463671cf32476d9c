/// Shown by the help modal (and `luapad guide`).
pub const GUIDE: &str = "\
luapad: a Lua playground

Write Lua (Luau dialect) in the editor and press Run. Output appears in the
console; Stop discards a running or waiting program.

Host functions available to scripts:
  print(...)   prints its arguments separated by tabs, followed by a newline
  io_read()    pauses the program until you submit a line of input, and
               returns that line as a string (nil at end of input);
               read() is the same function
  os_time()    current time in whole seconds since 1970-01-01 UTC

Import loads a file into the editor; Export saves the editor as code.lua.
";
