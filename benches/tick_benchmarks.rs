use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pixel_sim::{Grid, MaterialId, MaterialTable, TickDriver};

const GRID_SIZES: &[u32] = &[64, 128, 256];

fn seed_sand_column(grid: &mut Grid, width: u32) {
  for x in 0..width as i32 {
    for y in 0..8 {
      grid.set_mat(x, y, MaterialId::SAND);
    }
  }
}

fn bench_tick_falling_sand(c: &mut Criterion) {
  let mut group = c.benchmark_group("tick_falling_sand");

  for &size in GRID_SIZES {
    let cell_count = (size as u64) * (size as u64);
    group.throughput(Throughput::Elements(cell_count));

    let id = BenchmarkId::new("grid", size);
    group.bench_with_input(id, &size, |b, &size| {
      let materials = MaterialTable::new();
      b.iter_batched(
        || {
          let mut grid = Grid::new(size, size, 1).unwrap();
          seed_sand_column(&mut grid, size);
          let driver = TickDriver::with_seed(120.0, 7);
          (grid, driver)
        },
        |(mut grid, mut driver)| {
          driver.tick(&mut grid, &materials);
        },
        criterion::BatchSize::SmallInput,
      );
    });
  }

  group.finish();
}

fn bench_tick_idle_world(c: &mut Criterion) {
  let mut group = c.benchmark_group("tick_idle_world");

  for &size in GRID_SIZES {
    let cell_count = (size as u64) * (size as u64);
    group.throughput(Throughput::Elements(cell_count));

    let id = BenchmarkId::new("grid", size);
    group.bench_with_input(id, &size, |b, &size| {
      let materials = MaterialTable::new();
      let mut grid = Grid::new(size, size, 1).unwrap();
      let mut driver = TickDriver::with_seed(120.0, 7);

      b.iter(|| {
        driver.tick(&mut grid, &materials);
      });
    });
  }

  group.finish();
}

fn bench_tick_mixed_materials(c: &mut Criterion) {
  let mut group = c.benchmark_group("tick_mixed_materials");

  let size = 128u32;
  let cell_count = (size as u64) * (size as u64);
  group.throughput(Throughput::Elements(cell_count));

  group.bench_function("sand_water_fire", |b| {
    let materials = MaterialTable::new();
    b.iter_batched(
      || {
        let mut grid = Grid::new(size, size, 1).unwrap();
        for x in 0..size as i32 {
          grid.set_mat(x, 0, MaterialId::SAND);
          grid.set_mat(x, (size / 2) as i32, MaterialId::WATER);
        }
        grid.set_mat(size as i32 / 2, size as i32 - 1, MaterialId::WOOD);
        grid.set_mat(size as i32 / 2, size as i32 - 2, MaterialId::FIRE);
        let driver = TickDriver::with_seed(120.0, 11);
        (grid, driver)
      },
      |(mut grid, mut driver)| {
        driver.tick(&mut grid, &materials);
      },
      criterion::BatchSize::SmallInput,
    );
  });

  group.finish();
}

criterion_group!(benches, bench_tick_falling_sand, bench_tick_idle_world, bench_tick_mixed_materials);
criterion_main!(benches);
