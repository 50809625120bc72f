pub mod common;



#[cfg(test)]
mod test_action_prevention;



#[cfg(test)]
mod test_multi_turn;


#[cfg(test)]
mod test_fainting;


#[cfg(test)]
mod test_events;
