use grid_util::Point;
use grid_walker::{GridMap, Pathfinder, SearchState, TerrainType};

// Every strategy searches the same map from S to G, one expansion per update. The map is drawn
// every few steps with the closed set as 'o', the frontier as '+' and the final path as '*'.
//
// ..........
// .S...~~~..
// ...####...
// ,,,,,,#...
// ,,,,,,#.G.
// ..........
fn draw(pathfinder: &Pathfinder, start: Point, end: Point) {
    let map = pathfinder.map();
    let walker = pathfinder.current_walker();
    let frontier = walker.frontier_positions();
    for y in 0..map.height() as i32 {
        let row: String = (0..map.width() as i32)
            .map(|x| {
                let p = Point::new(x, y);
                if p == start {
                    'S'
                } else if p == end {
                    'G'
                } else if pathfinder.get_path_line().contains(&p) {
                    '*'
                } else if frontier.contains(&p) {
                    '+'
                } else if walker.is_closed(&p) {
                    'o'
                } else {
                    map.get_type(x, y).unwrap_or_default().symbol()
                }
            })
            .collect();
        println!("{row}");
    }
    println!();
}

fn main() {
    let mut map = GridMap::new(10, 6, Default::default(), Default::default()).unwrap();
    for x in 5..8 {
        map.set_type(x, 1, TerrainType::Water).unwrap();
        map.set_cost(x, 1, 3).unwrap();
    }
    for x in 3..7 {
        map.set_type(x, 2, TerrainType::Obstacle).unwrap();
    }
    for y in 3..5 {
        map.set_type(6, y, TerrainType::Obstacle).unwrap();
        for x in 0..6 {
            map.set_type(x, y, TerrainType::Marsh).unwrap();
            map.set_cost(x, y, 4).unwrap();
        }
    }
    map.generate_components();
    println!("{map}");

    let start = Point::new(1, 1);
    let end = Point::new(8, 4);
    let mut pathfinder = Pathfinder::new(map);
    for index in 0..pathfinder.walkers().len() {
        pathfinder.set_current_walker(index).unwrap();
        pathfinder.start_search(start, end).unwrap();
        println!("== {} ==", pathfinder.current_walker().name());
        let mut steps = 0;
        while pathfinder.update(1.0 / 60.0).unwrap() == SearchState::Searching {
            steps += 1;
            if steps % 10 == 0 {
                println!("step {steps}");
                draw(&pathfinder, start, end);
            }
        }
        println!(
            "{:?} after {} expansions, path cost {:?}",
            pathfinder.state(),
            pathfinder.current_walker().closed_positions().count(),
            pathfinder.path_cost()
        );
        draw(&pathfinder, start, end);
    }
}
